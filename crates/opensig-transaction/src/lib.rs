/// OpenSig transaction - P2PKH transaction assembly, signing and serialization.
///
/// Provides the `Transaction` wire type, legacy signature hashing, the P2PKH
/// template, and `TransactionBuilder`, the add-input / add-output / sign /
/// build surface the ledger gateway hands to the signing pipeline.

pub mod address;
pub mod builder;
pub mod input;
pub mod output;
pub mod script;
pub mod sighash;
pub mod template;
pub mod transaction;

mod error;
pub use address::{Address, Network};
pub use builder::{BuiltTransaction, TransactionBuilder};
pub use error::TransactionError;
pub use input::TransactionInput;
pub use output::TransactionOutput;
pub use script::Script;
pub use transaction::Transaction;

#[cfg(test)]
mod tests;
