//! The transport seam between a gateway and the network.

use std::error::Error as _;
use std::path::PathBuf;

use tracing::debug;

use crate::error::LedgerError;
use crate::fixture::FixtureTransport;

/// Moves request text to a ledger and response text back.
pub trait Transport: Send + Sync {
    /// Perform a GET request and return the response body.
    fn get(&self, url: &str) -> impl std::future::Future<Output = Result<String, LedgerError>> + Send;

    /// POST a single-field form and return the response body.
    fn post_form(
        &self,
        url: &str,
        field: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<String, LedgerError>> + Send;
}

/// Live transport over HTTP.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a default reqwest client.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a transport around an existing client (timeouts, proxies, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn read_body(resp: reqwest::Response) -> Result<String, LedgerError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LedgerError::Status {
                status: status.as_u16(),
                body,
            });
        }
        resp.text().await.map_err(map_reqwest_error)
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, LedgerError> {
        debug!(url, "GET");
        let resp = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        Self::read_body(resp).await
    }

    async fn post_form(&self, url: &str, field: &str, value: &str) -> Result<String, LedgerError> {
        debug!(url, field, "POST");
        let resp = self
            .client
            .post(url)
            .form(&[(field, value)])
            .send()
            .await
            .map_err(map_reqwest_error)?;
        Self::read_body(resp).await
    }
}

const NAME_RESOLUTION_MARKERS: [&str; 5] = [
    "dns error",
    "failed to lookup address",
    "name or service not known",
    "no such host",
    "nodename nor servname",
];

fn is_name_resolution(err: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = err.source();
    while let Some(e) = source {
        let text = e.to_string().to_lowercase();
        if NAME_RESOLUTION_MARKERS.iter().any(|m| text.contains(m)) {
            return true;
        }
        source = e.source();
    }
    false
}

fn map_reqwest_error(err: reqwest::Error) -> LedgerError {
    if is_name_resolution(&err) {
        return LedgerError::NameResolution {
            host: err.url().and_then(|u| u.host_str()).map(str::to_string),
            message: err.to_string(),
        };
    }
    let code = if err.is_timeout() {
        Some("ETIMEDOUT".to_string())
    } else if err.is_connect() {
        Some("ECONNREFUSED".to_string())
    } else {
        None
    };
    LedgerError::Request {
        code,
        message: err.to_string(),
    }
}

/// The transport a gateway is constructed with.
///
/// Chosen once per gateway from configuration; live traffic and recorded
/// fixtures never mix inside one instance.
#[derive(Debug)]
pub enum TransportStrategy {
    /// Live HTTP.
    Http(HttpTransport),
    /// Recorded responses read from a directory.
    Fixture(FixtureTransport),
}

impl TransportStrategy {
    /// Live HTTP with a default client.
    pub fn http() -> Self {
        TransportStrategy::Http(HttpTransport::new())
    }

    /// Fixture responses from `directory`.
    pub fn fixture(directory: impl Into<PathBuf>) -> Self {
        TransportStrategy::Fixture(FixtureTransport::new(directory))
    }

    /// Whether this strategy serves recorded responses.
    pub fn is_fixture(&self) -> bool {
        matches!(self, TransportStrategy::Fixture(_))
    }

    /// The fixture transport, when this strategy replays recordings.
    pub fn as_fixture(&self) -> Option<&FixtureTransport> {
        match self {
            TransportStrategy::Fixture(t) => Some(t),
            TransportStrategy::Http(_) => None,
        }
    }
}

impl Transport for TransportStrategy {
    async fn get(&self, url: &str) -> Result<String, LedgerError> {
        match self {
            TransportStrategy::Http(t) => t.get(url).await,
            TransportStrategy::Fixture(t) => t.get(url).await,
        }
    }

    async fn post_form(&self, url: &str, field: &str, value: &str) -> Result<String, LedgerError> {
        match self {
            TransportStrategy::Http(t) => t.post_form(url, field, value).await,
            TransportStrategy::Fixture(t) => t.post_form(url, field, value).await,
        }
    }
}
