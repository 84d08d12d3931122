//! Script templates used when signing transaction inputs.

pub mod p2pkh;

use crate::script::Script;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Produces the unlocking script for one input of a transaction.
///
/// Implementations compute the signature hash, sign it and assemble the
/// script. The transaction's outputs must be final before `sign` runs.
pub trait UnlockingScriptTemplate {
    /// Produce an unlocking script for the input at `input_index`.
    fn sign(&self, tx: &Transaction, input_index: usize) -> Result<Script, TransactionError>;
}
