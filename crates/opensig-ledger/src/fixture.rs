//! File-driven response injector for deterministic tests.
//!
//! Each call reads the next `testURLResponse<N>` file (N counts up from 1)
//! from the fixture directory:
//!
//! ```json
//! { "expectedURL": "https://blockchain.info/q/addressbalance/1abc",
//!   "testType":    "response",
//!   "data":        "3" }
//! ```
//!
//! `testType` is `response`, `synchronousError` or `asynchronousError`, and
//! the payload comes either inline as `data` or from `file`, a path relative
//! to the fixture directory. For POST requests `expectedURL` holds the JSON
//! text of `{"method":"POST","url":...,"form":{...}}`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::LedgerError;
use crate::transport::Transport;

/// Prefix of the numbered fixture files.
pub const FIXTURE_FILE_PREFIX: &str = "testURLResponse";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
enum TestType {
    Response,
    SynchronousError,
    AsynchronousError,
}

#[derive(Debug, Deserialize)]
struct Directive {
    #[serde(rename = "expectedURL")]
    expected_url: String,
    #[serde(rename = "testType")]
    test_type: TestType,
    data: Option<String>,
    file: Option<String>,
}

/// Replays recorded ledger responses in strict sequence.
#[derive(Debug)]
pub struct FixtureTransport {
    directory: PathBuf,
    calls: AtomicUsize,
}

impl FixtureTransport {
    /// Serve fixtures from `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// The fixture directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Number of requests served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Start again from the first fixture file.
    pub fn reset(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }

    async fn serve(&self, request: &str, matches: impl Fn(&str) -> bool) -> Result<String, LedgerError> {
        let number = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let name = format!("{FIXTURE_FILE_PREFIX}{number}");
        let path = self.directory.join(&name);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LedgerError::Io { path: path.clone(), source })?;

        let directive: Directive = serde_json::from_str(&raw)
            .map_err(|e| LedgerError::Fixture(format!("invalid fixture file {name}: {e}")))?;

        if !matches(&directive.expected_url) {
            warn!(fixture = %name, request, "unexpected ledger request");
            return Err(LedgerError::Fixture(format!(
                "invalid request '{}', expected '{}'",
                request, directive.expected_url
            )));
        }

        let data = match (directive.data, directive.file) {
            (Some(data), _) => data,
            (None, Some(file)) => {
                let data_path = self.directory.join(file);
                tokio::fs::read_to_string(&data_path).await.map_err(|e| {
                    LedgerError::Fixture(format!("error reading file {}: {}", data_path.display(), e))
                })?
            }
            (None, None) => return Err(LedgerError::Fixture(format!("data is undefined in {name}"))),
        };

        debug!(fixture = %name, test_type = ?directive.test_type, "injecting ledger response");
        match directive.test_type {
            TestType::Response => Ok(data),
            TestType::SynchronousError | TestType::AsynchronousError => Err(decode_error(&data)),
        }
    }
}

impl Transport for FixtureTransport {
    async fn get(&self, url: &str) -> Result<String, LedgerError> {
        self.serve(url, |expected| expected == url).await
    }

    async fn post_form(&self, url: &str, field: &str, value: &str) -> Result<String, LedgerError> {
        let request = json!({ "method": "POST", "url": url, "form": { field: value } });
        let text = request.to_string();
        self.serve(&text, |expected| {
            serde_json::from_str::<Value>(expected).is_ok_and(|v| v == request)
        })
        .await
    }
}

/// Turn recorded error data into the error a live transport would give.
fn decode_error(data: &str) -> LedgerError {
    let raw = if data.trim_start().starts_with('{') {
        serde_json::from_str::<Value>(data).ok()
    } else {
        None
    };
    let Some(raw) = raw else {
        return LedgerError::Unknown {
            name: "TestError".to_string(),
            raw: Value::String(data.to_string()),
        };
    };

    let name = raw.get("name").and_then(Value::as_str).unwrap_or_default().to_string();
    let message = raw.get("message").and_then(Value::as_str).unwrap_or_default().to_string();

    match name.as_str() {
        "RequestError" => {
            let cause = raw.get("cause");
            let code = cause.and_then(|c| c.get("code")).and_then(Value::as_str);
            if code == Some("ENOTFOUND") {
                LedgerError::NameResolution {
                    host: cause
                        .and_then(|c| c.get("hostname"))
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    message,
                }
            } else {
                LedgerError::Request {
                    code: code.map(str::to_string),
                    message,
                }
            }
        }
        "StatusCodeError" => match raw.get("statusCode").and_then(Value::as_u64) {
            Some(status) if status <= u16::MAX as u64 => LedgerError::Status {
                status: status as u16,
                body: match raw.get("error") {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => message,
                },
            },
            _ => LedgerError::Unknown { name, raw },
        },
        _ => LedgerError::Unknown { name, raw },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_not_found_request_error() {
        let err = decode_error(
            r#"{"name":"RequestError","message":"getaddrinfo ENOTFOUND","cause":{"code":"ENOTFOUND","hostname":"blockchain.info"}}"#,
        );
        match err {
            LedgerError::NameResolution { host, .. } => {
                assert_eq!(host.as_deref(), Some("blockchain.info"))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_decode_other_request_error() {
        let err = decode_error(r#"{"name":"RequestError","message":"boom","cause":{"code":"UNKNOWN"}}"#);
        assert!(matches!(err, LedgerError::Request { code: Some(ref c), .. } if c == "UNKNOWN"));
    }

    #[test]
    fn test_decode_status_code_error() {
        let err = decode_error(
            r#"{"name":"StatusCodeError","statusCode":500,"message":"500 - No free outputs to spend","error":"No free outputs to spend"}"#,
        );
        match err {
            LedgerError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "No free outputs to spend");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_decode_status_code_error_without_numeric_status() {
        let err = decode_error(r#"{"name":"StatusCodeError","statusCode":"unknown"}"#);
        assert!(matches!(err, LedgerError::Unknown { ref name, .. } if name == "StatusCodeError"));
    }

    #[test]
    fn test_decode_unknown_and_plain_text() {
        let err = decode_error(r#"{"name":"APIError","message":"nope"}"#);
        match err {
            LedgerError::Unknown { name, raw } => {
                assert_eq!(name, "APIError");
                assert_eq!(raw["message"], "nope");
            }
            other => panic!("unexpected {other:?}"),
        }

        let err = decode_error("something odd");
        assert!(matches!(err, LedgerError::Unknown { ref name, .. } if name == "TestError"));
    }
}
