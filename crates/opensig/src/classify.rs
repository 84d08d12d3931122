//! Mapping of raw ledger failures onto the OpenSig error taxonomy.

use opensig_ledger::{LedgerError, LedgerFailure, RequestContext};
use serde_json::json;

use crate::error::OpenSigError;
use crate::filesystem;

/// Body text blockchain.info returns when an address has nothing to spend.
pub const NO_FREE_OUTPUTS: &str = "No free outputs to spend";

/// Classify a raw ledger error raised while serving `request`.
///
/// Pure; performs no I/O.
pub fn classify(error: &LedgerError, request: &RequestContext) -> OpenSigError {
    match error {
        LedgerError::NameResolution { .. } => OpenSigError::BlockchainNotFound {
            details: Some(error.to_details()),
        },
        LedgerError::Request { code: Some(code), .. } if code == "ENOTFOUND" => {
            OpenSigError::BlockchainNotFound {
                details: Some(error.to_details()),
            }
        }
        LedgerError::Status { status: 500, body } if body.contains(NO_FREE_OUTPUTS) => {
            OpenSigError::InsufficientFunds
        }
        LedgerError::Status { status, body } => {
            let message = if body.trim().is_empty() {
                format!("ledger api returned status {status}")
            } else {
                body.clone()
            };
            OpenSigError::blockchain(
                message,
                json!({
                    "url": request.url,
                    "method": request.method,
                    "body": request.body,
                    "status": status,
                    "error": error.to_details(),
                }),
            )
        }
        LedgerError::Request { .. } => OpenSigError::blockchain(
            "ledger request failed",
            json!({ "url": request.url, "error": error.to_details() }),
        ),
        LedgerError::Unknown { name, raw } => OpenSigError::blockchain(
            format!("unknown error from ledger api: {name}"),
            json!({ "url": request.url, "error": raw }),
        ),
        LedgerError::InvalidResponse { body, reason } => OpenSigError::blockchain(
            "ledger response was invalid",
            json!({ "url": request.url, "body": body, "reason": reason }),
        ),
        LedgerError::Io { path, source } => filesystem::fs_error(source, path),
        LedgerError::Fixture(message) => OpenSigError::Internal {
            message: message.clone(),
            details: Some(json!({ "url": request.url, "body": request.body })),
        },
    }
}

/// Classify a gateway failure using the request it carries.
pub fn classify_failure(failure: &LedgerFailure) -> OpenSigError {
    classify(&failure.error, &failure.request)
}

impl From<LedgerFailure> for OpenSigError {
    fn from(failure: LedgerFailure) -> Self {
        classify_failure(&failure)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::ErrorCode;

    fn unspent_request() -> RequestContext {
        RequestContext::get("https://blockchain.info/unspent?active=1M9jofAErijG4eiPUy19Qxot1KkPRRzyet")
    }

    #[test]
    fn test_name_resolution_is_not_found() {
        let err = LedgerError::NameResolution {
            host: Some("blockchain.info".to_string()),
            message: "dns error".to_string(),
        };
        let classified = classify(&err, &unspent_request());
        assert_eq!(classified.error_code(), ErrorCode::BlockchainNotFound);
        assert_eq!(classified.details().unwrap()["host"], "blockchain.info");

        let err = LedgerError::Request {
            code: Some("ENOTFOUND".to_string()),
            message: "getaddrinfo ENOTFOUND".to_string(),
        };
        assert_eq!(classify(&err, &unspent_request()).code(), 700);
    }

    #[test]
    fn test_no_free_outputs_is_insufficient_funds() {
        let err = LedgerError::Status {
            status: 500,
            body: "No free outputs to spend".to_string(),
        };
        let classified = classify(&err, &unspent_request());
        assert_eq!(classified.code(), 600);
        assert!(classified.details().is_none());
    }

    #[test]
    fn test_other_status_keeps_body_and_context() {
        let err = LedgerError::Status {
            status: 500,
            body: "Unable to decode transaction".to_string(),
        };
        let request = RequestContext::post("https://blockchain.info/pushtx", "tx=00");
        let classified = classify(&err, &request);
        assert_eq!(classified.code(), 500);
        assert_eq!(classified.message(), "Unable to decode transaction");
        let details = classified.details().unwrap();
        assert_eq!(details["url"], "https://blockchain.info/pushtx");
        assert_eq!(details["method"], "POST");
        assert_eq!(details["body"], "tx=00");
        assert_eq!(details["status"], 500);

        let err = LedgerError::Status { status: 503, body: String::new() };
        assert_eq!(
            classify(&err, &request).message(),
            "ledger api returned status 503"
        );
    }

    #[test]
    fn test_request_error() {
        let err = LedgerError::Request {
            code: Some("UNKNOWN".to_string()),
            message: "socket hang up".to_string(),
        };
        let classified = classify(&err, &unspent_request());
        assert_eq!(classified.code(), 500);
        assert_eq!(classified.message(), "ledger request failed");
    }

    #[test]
    fn test_unknown_error_wraps_raw() {
        let raw = json!({ "name": "APIError", "message": "something" });
        let err = LedgerError::Unknown { name: "APIError".to_string(), raw: raw.clone() };
        let request = unspent_request();
        let classified = classify(&err, &request);
        assert_eq!(classified.code(), 500);
        assert_eq!(classified.message(), "unknown error from ledger api: APIError");
        assert_eq!(
            classified.details(),
            Some(&json!({ "url": request.url, "error": raw }))
        );
    }

    #[test]
    fn test_invalid_response() {
        let err = LedgerError::InvalidResponse {
            body: "<html>".to_string(),
            reason: "expected value".to_string(),
        };
        let classified = classify(&err, &unspent_request());
        assert_eq!(classified.code(), 500);
        assert_eq!(classified.message(), "ledger response was invalid");
    }

    #[test]
    fn test_io_and_fixture_errors() {
        let err = LedgerError::Io {
            path: PathBuf::from("testURLResponse1"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let classified = classify(&err, &unspent_request());
        assert_eq!(classified.code(), 300);
        assert_eq!(classified.message(), "no such file or directory testURLResponse1");

        let err = LedgerError::Fixture("invalid request".to_string());
        assert_eq!(classify(&err, &unspent_request()).code(), 100);
    }

    #[test]
    fn test_from_failure() {
        let failure = LedgerFailure::new(
            unspent_request(),
            LedgerError::Status { status: 500, body: NO_FREE_OUTPUTS.to_string() },
        );
        let err: OpenSigError = failure.into();
        assert!(matches!(err, OpenSigError::InsufficientFunds));
    }
}
