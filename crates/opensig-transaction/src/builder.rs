//! Incremental transaction builder.
//!
//! The ledger gateway hands one of these to the signing pipeline, which
//! adds inputs for the selected unspent outputs, adds the payment and change
//! outputs, signs every input and finally asks for the serialized result.

use opensig_primitives::chainhash::Hash;
use opensig_primitives::ec::PrivateKey;

use crate::address::Address;
use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::template::p2pkh;
use crate::template::UnlockingScriptTemplate;
use crate::transaction::Transaction;
use crate::TransactionError;

/// A finished, fully signed transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuiltTransaction {
    /// Transaction id in display (byte-reversed) hex.
    pub id: String,
    /// Raw transaction bytes as hex.
    pub hex: String,
}

/// Builds and signs a P2PKH transaction.
///
/// Inputs and outputs must all be added before the first call to `sign`;
/// once any input carries a signature the shape of the transaction is
/// frozen.
#[derive(Clone, Debug, Default)]
pub struct TransactionBuilder {
    tx: Transaction,
}

impl TransactionBuilder {
    /// Start an empty version 1 transaction.
    pub fn new() -> Self {
        TransactionBuilder {
            tx: Transaction::new(),
        }
    }

    /// Add an input spending a previous output.
    ///
    /// # Arguments
    /// * `output_id` - 64-character display-order hex id of the transaction being spent.
    /// * `output_index` - Index of the output within that transaction.
    /// * `sequence` - The input's sequence number.
    ///
    /// # Returns
    /// The position of the new input, or `InvalidInput` for a malformed id.
    pub fn add_input(
        &mut self,
        output_id: &str,
        output_index: u32,
        sequence: u32,
    ) -> Result<usize, TransactionError> {
        self.ensure_unsigned()?;
        let hash = Hash::from_hex(output_id)
            .map_err(|e| TransactionError::InvalidInput(format!("output id '{}': {}", output_id, e)))?;
        self.tx
            .add_input(TransactionInput::new(*hash.as_bytes(), output_index, sequence));
        Ok(self.tx.inputs.len() - 1)
    }

    /// Add a P2PKH output paying `amount` satoshis to `address`.
    ///
    /// # Returns
    /// The position of the new output, or `InvalidAddress`.
    pub fn add_output(&mut self, address: &str, amount: u64) -> Result<usize, TransactionError> {
        self.ensure_unsigned()?;
        let address = Address::from_string(address)?;
        self.tx
            .add_output(TransactionOutput::new(amount, p2pkh::lock(&address)));
        Ok(self.tx.outputs.len() - 1)
    }

    /// Sign the input at `index` with `key`.
    ///
    /// The spent output must pay to the compressed-key address of `key`.
    pub fn sign(&mut self, index: usize, key: &PrivateKey) -> Result<(), TransactionError> {
        if self.tx.outputs.is_empty() {
            return Err(TransactionError::SigningError(
                "cannot sign a transaction without outputs".to_string(),
            ));
        }
        let script = p2pkh::unlock(key).sign(&self.tx, index)?;
        self.tx.inputs[index].unlocking_script = Some(script);
        Ok(())
    }

    /// Serialize the finished transaction.
    ///
    /// # Returns
    /// The id and hex, or `InvalidTransaction` if there are no inputs, no
    /// outputs, or an input is still unsigned.
    pub fn build(&self) -> Result<BuiltTransaction, TransactionError> {
        if self.tx.inputs.is_empty() || self.tx.outputs.is_empty() {
            return Err(TransactionError::InvalidTransaction(
                "transaction needs at least one input and one output".to_string(),
            ));
        }
        if let Some(pos) = self.tx.inputs.iter().position(|i| !i.is_signed()) {
            return Err(TransactionError::InvalidTransaction(format!(
                "input {} is not signed",
                pos
            )));
        }
        Ok(BuiltTransaction {
            id: self.tx.tx_id_hex(),
            hex: self.tx.to_hex(),
        })
    }

    /// Borrow the transaction under construction.
    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    fn ensure_unsigned(&self) -> Result<(), TransactionError> {
        if self.tx.inputs.iter().any(TransactionInput::is_signed) {
            return Err(TransactionError::InvalidTransaction(
                "cannot change inputs or outputs after signing".to_string(),
            ));
        }
        Ok(())
    }
}
