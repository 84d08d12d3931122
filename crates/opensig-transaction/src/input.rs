//! Transaction input referencing a previous output.

use opensig_primitives::util::BsvWriter;

use crate::script::Script;

/// Sequence number of a finalized input.
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// A single input in a transaction.
///
/// # Wire format
///
/// | Field              | Size             |
/// |--------------------|------------------|
/// | source_txid        | 32 bytes (LE)    |
/// | source_tx_out_index| 4 bytes (LE)     |
/// | script length      | VarInt           |
/// | unlocking_script   | variable         |
/// | sequence_number    | 4 bytes (LE)     |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionInput {
    /// Id of the transaction being spent from, in internal byte order.
    pub source_txid: [u8; 32],

    /// Index of the output within the source transaction.
    pub source_tx_out_index: u32,

    /// Sequence number.
    pub sequence_number: u32,

    /// The unlocking script, `None` until the input is signed.
    pub unlocking_script: Option<Script>,
}

impl TransactionInput {
    /// Create an unsigned input spending `source_tx_out_index` of `source_txid`.
    pub fn new(source_txid: [u8; 32], source_tx_out_index: u32, sequence_number: u32) -> Self {
        TransactionInput {
            source_txid,
            source_tx_out_index,
            sequence_number,
            unlocking_script: None,
        }
    }

    /// Whether an unlocking script has been attached.
    pub fn is_signed(&self) -> bool {
        self.unlocking_script.is_some()
    }

    /// Serialize this input with its own unlocking script (empty if unsigned).
    pub fn write_to(&self, writer: &mut BsvWriter) {
        let script = self
            .unlocking_script
            .as_ref()
            .map(Script::to_bytes)
            .unwrap_or_default();
        self.write_with_script(writer, script);
    }

    /// Serialize this input with `script` in place of its unlocking script.
    ///
    /// Signature hashing substitutes the previous output's locking script
    /// (or nothing) here.
    pub fn write_with_script(&self, writer: &mut BsvWriter, script: &[u8]) {
        writer.write_bytes(&self.source_txid);
        writer.write_u32_le(self.source_tx_out_index);
        writer.write_var_bytes(script);
        writer.write_u32_le(self.sequence_number);
    }
}
