//! Signature hash computation for transaction signing.
//!
//! Implements the original (pre-segwit, non-FORKID) algorithm: every input
//! script is blanked except the one being signed, which carries the locking
//! script of the output it spends, and the sighash type is appended as a
//! 4-byte little-endian integer before double SHA-256.

use opensig_primitives::hash::sha256d;
use opensig_primitives::util::BsvWriter;

use crate::transaction::Transaction;
use crate::TransactionError;

/// Sign all inputs and all outputs.
pub const SIGHASH_ALL: u32 = 0x01;

/// Build the legacy signature preimage for an input.
///
/// # Arguments
/// * `tx` - The transaction being signed.
/// * `input_index` - Index of the input being signed.
/// * `script_code` - The locking script of the output being spent.
/// * `sighash_type` - Only `SIGHASH_ALL` is supported.
///
/// # Returns
/// The serialized preimage, or an error for an out-of-range index or an
/// unsupported sighash type.
pub fn legacy_preimage(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    sighash_type: u32,
) -> Result<Vec<u8>, TransactionError> {
    if input_index >= tx.inputs.len() {
        return Err(TransactionError::SigningError(format!(
            "input index {} out of range (tx has {} inputs)",
            input_index,
            tx.inputs.len()
        )));
    }
    if sighash_type != SIGHASH_ALL {
        return Err(TransactionError::SigningError(format!(
            "unsupported sighash type 0x{:02x}",
            sighash_type
        )));
    }

    let mut writer = BsvWriter::with_capacity(256);
    let mut index = 0;
    tx.write_with(&mut writer, |input, w| {
        let script: &[u8] = if index == input_index { script_code } else { &[] };
        input.write_with_script(w, script);
        index += 1;
    });
    writer.write_u32_le(sighash_type);
    Ok(writer.into_bytes())
}

/// Compute the legacy signature hash for an input.
///
/// # Returns
/// The 32-byte double-SHA256 of `legacy_preimage`.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    sighash_type: u32,
) -> Result<[u8; 32], TransactionError> {
    Ok(sha256d(&legacy_preimage(tx, input_index, script_code, sighash_type)?))
}
