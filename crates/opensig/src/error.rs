//! The closed OpenSig error taxonomy.

use serde_json::{json, Value};

/// Stable numeric error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum ErrorCode {
    /// Invariant violation; a bug.
    Internal = 100,
    /// Caller-supplied token or parameter is invalid.
    Argument = 200,
    /// A local file is missing or unreadable.
    FileSystem = 300,
    /// Any ledger or transport failure not otherwise classified.
    Blockchain = 500,
    /// The available outputs cannot cover the payment and fee.
    InsufficientFunds = 600,
    /// The ledger host is unreachable.
    BlockchainNotFound = 700,
}

impl ErrorCode {
    /// Every code, in ascending order.
    pub const ALL: [ErrorCode; 6] = [
        ErrorCode::Internal,
        ErrorCode::Argument,
        ErrorCode::FileSystem,
        ErrorCode::Blockchain,
        ErrorCode::InsufficientFunds,
        ErrorCode::BlockchainNotFound,
    ];

    /// The numeric value.
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Look up a code by its numeric value.
    pub fn from_u16(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_u16() == code)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Every failure an OpenSig operation can report.
///
/// Each variant has a stable [`ErrorCode`], a human message (the `Display`
/// text) and optional diagnostic details.
#[derive(Debug, thiserror::Error)]
pub enum OpenSigError {
    /// An internal consistency check failed.
    #[error("Internal Error! {message}")]
    Internal {
        /// What went wrong.
        message: String,
        /// Diagnostic data.
        details: Option<Value>,
    },

    /// A caller-supplied argument was invalid.
    #[error("{message}")]
    Argument {
        /// What was wrong with the argument.
        message: String,
        /// Diagnostic data.
        details: Option<Value>,
    },

    /// A local file could not be read.
    #[error("{message}")]
    FileSystem {
        /// Decoded file system message, e.g. `no such file or directory <path>`.
        message: String,
        /// Diagnostic data.
        details: Option<Value>,
    },

    /// The ledger failed in a way not covered by a more specific variant.
    #[error("{message}")]
    Blockchain {
        /// Ledger or transport message.
        message: String,
        /// Request context and the raw error.
        details: Option<Value>,
    },

    /// The source address cannot fund the payment and fee.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// The ledger could not be reached.
    #[error("Blockchain not accessible.  Try again later.")]
    BlockchainNotFound {
        /// The transport error.
        details: Option<Value>,
    },
}

impl OpenSigError {
    /// An internal error without details.
    pub fn internal(message: impl Into<String>) -> Self {
        OpenSigError::Internal {
            message: message.into(),
            details: None,
        }
    }

    /// An argument error without details.
    pub fn argument(message: impl Into<String>) -> Self {
        OpenSigError::Argument {
            message: message.into(),
            details: None,
        }
    }

    /// A ledger error with the given details.
    pub fn blockchain(message: impl Into<String>, details: Value) -> Self {
        OpenSigError::Blockchain {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Attach details to any variant that carries them.
    pub fn with_details(mut self, value: Value) -> Self {
        match &mut self {
            OpenSigError::Internal { details, .. }
            | OpenSigError::Argument { details, .. }
            | OpenSigError::FileSystem { details, .. }
            | OpenSigError::Blockchain { details, .. }
            | OpenSigError::BlockchainNotFound { details } => *details = Some(value),
            OpenSigError::InsufficientFunds => {}
        }
        self
    }

    /// The error's code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            OpenSigError::Internal { .. } => ErrorCode::Internal,
            OpenSigError::Argument { .. } => ErrorCode::Argument,
            OpenSigError::FileSystem { .. } => ErrorCode::FileSystem,
            OpenSigError::Blockchain { .. } => ErrorCode::Blockchain,
            OpenSigError::InsufficientFunds => ErrorCode::InsufficientFunds,
            OpenSigError::BlockchainNotFound { .. } => ErrorCode::BlockchainNotFound,
        }
    }

    /// The numeric code.
    pub fn code(&self) -> u16 {
        self.error_code().as_u16()
    }

    /// The human readable message.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Diagnostic details, if any.
    pub fn details(&self) -> Option<&Value> {
        match self {
            OpenSigError::Internal { details, .. }
            | OpenSigError::Argument { details, .. }
            | OpenSigError::FileSystem { details, .. }
            | OpenSigError::Blockchain { details, .. }
            | OpenSigError::BlockchainNotFound { details } => details.as_ref(),
            OpenSigError::InsufficientFunds => None,
        }
    }

    /// JSON rendering: `{name, code, message, details}`.
    pub fn to_json(&self) -> Value {
        json!({
            "name": "OpenSigError",
            "code": self.code(),
            "message": self.message(),
            "details": self.details(),
        })
    }
}

/// Result alias for OpenSig operations.
pub type Result<T> = std::result::Result<T, OpenSigError>;
