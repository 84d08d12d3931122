//! Raw failure shapes produced by transports and gateways.
//!
//! These are deliberately close to what the wire gave us; turning them into
//! a user-facing taxonomy is the job of the caller's classifier.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::{json, Value};

/// Errors that can occur when talking to a ledger backend.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The ledger host name could not be resolved.
    #[error("name resolution failed: {message}")]
    NameResolution {
        /// Host that failed to resolve, when known.
        host: Option<String>,
        /// Transport message.
        message: String,
    },

    /// The request failed below the HTTP layer (connect, timeout, TLS, ...).
    #[error("request failed: {message}")]
    Request {
        /// Short error code such as `ETIMEDOUT`, when one could be determined.
        code: Option<String>,
        /// Transport message.
        message: String,
    },

    /// The ledger answered with a non-success status.
    #[error("ledger returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// The response body could not be understood.
    #[error("invalid response: {reason}")]
    InvalidResponse {
        /// Raw body that failed to parse.
        body: String,
        /// Parser message.
        reason: String,
    },

    /// An error whose shape is not recognized.
    #[error("unknown ledger error: {name}")]
    Unknown {
        /// Error name as reported by its source.
        name: String,
        /// The error as received.
        raw: Value,
    },

    /// A local file needed to serve the request could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The fixture transport was driven in a way its recordings do not allow.
    #[error("fixture error: {0}")]
    Fixture(String),
}

impl LedgerError {
    /// JSON rendering of the error for diagnostics.
    ///
    /// Unknown errors give back exactly what was received; the other shapes
    /// are rendered field by field.
    pub fn to_details(&self) -> Value {
        match self {
            LedgerError::NameResolution { host, message } => {
                json!({ "name": "NameResolution", "host": host, "message": message })
            }
            LedgerError::Request { code, message } => {
                json!({ "name": "RequestError", "code": code, "message": message })
            }
            LedgerError::Status { status, body } => {
                json!({ "name": "StatusCodeError", "statusCode": status, "error": body })
            }
            LedgerError::InvalidResponse { body, reason } => {
                json!({ "name": "InvalidResponse", "body": body, "reason": reason })
            }
            LedgerError::Unknown { raw, .. } => raw.clone(),
            LedgerError::Io { path, source } => {
                json!({ "name": "IoError", "path": path.display().to_string(), "message": source.to_string() })
            }
            LedgerError::Fixture(message) => json!({ "name": "FixtureError", "message": message }),
        }
    }
}

/// The request a ledger failure happened on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RequestContext {
    /// HTTP method.
    pub method: String,
    /// Full request URL.
    pub url: String,
    /// Form body, for POST requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RequestContext {
    /// Context for a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        RequestContext {
            method: "GET".to_string(),
            url: url.into(),
            body: None,
        }
    }

    /// Context for a form POST request.
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        RequestContext {
            method: "POST".to_string(),
            url: url.into(),
            body: Some(body.into()),
        }
    }
}

/// A ledger error together with the request that produced it.
#[derive(Debug, thiserror::Error)]
#[error("{} {}: {error}", request.method, request.url)]
pub struct LedgerFailure {
    /// The failed request.
    pub request: RequestContext,
    /// What went wrong.
    #[source]
    pub error: LedgerError,
}

impl LedgerFailure {
    /// Pair an error with its request.
    pub fn new(request: RequestContext, error: LedgerError) -> Self {
        LedgerFailure { request, error }
    }
}
