/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The transaction structure is invalid (e.g. missing inputs or outputs).
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    /// An input reference (output id or index) is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// An output address could not be parsed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    /// An error occurred while signing an input.
    #[error("signing error: {0}")]
    SigningError(String),
    /// Script construction failed.
    #[error("script error: {0}")]
    Script(String),
    /// An underlying primitives error (forwarded from `opensig-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] opensig_primitives::PrimitivesError),
}
