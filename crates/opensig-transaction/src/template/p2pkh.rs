//! Pay-to-Public-Key-Hash (P2PKH) script template.
//!
//! Locking scripts are `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG`;
//! unlocking scripts are `<sig> <pubkey>` with the compressed public key.

use opensig_primitives::ec::PrivateKey;

use crate::address::{Address, Network};
use crate::script::*;
use crate::sighash::{self, SIGHASH_ALL};
use crate::template::UnlockingScriptTemplate;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Create a P2PKH locking script paying to `address`.
///
/// # Returns
/// The 25-byte locking script.
pub fn lock(address: &Address) -> Script {
    let mut bytes = Vec::with_capacity(25);
    bytes.push(OP_DUP);
    bytes.push(OP_HASH160);
    bytes.push(OP_DATA_20);
    bytes.extend_from_slice(&address.public_key_hash);
    bytes.push(OP_EQUALVERIFY);
    bytes.push(OP_CHECKSIG);
    Script::from_bytes(&bytes)
}

/// Create a P2PKH unlocker for `private_key` signing with `SIGHASH_ALL`.
pub fn unlock(private_key: &PrivateKey) -> P2PKH<'_> {
    P2PKH {
        private_key,
        sighash_flag: SIGHASH_ALL,
    }
}

/// P2PKH signing template.
///
/// The output being spent is assumed to pay to the compressed-key address
/// of `private_key`, so its locking script is rebuilt from the key rather
/// than looked up.
pub struct P2PKH<'a> {
    private_key: &'a PrivateKey,
    sighash_flag: u32,
}

impl UnlockingScriptTemplate for P2PKH<'_> {
    /// Sign the input and produce `<DER sig || sighash byte> <compressed pubkey>`.
    fn sign(&self, tx: &Transaction, input_index: usize) -> Result<Script, TransactionError> {
        let pub_key = self.private_key.pub_key();
        let prev_lock = lock(&Address::from_public_key_hash(
            &pub_key.hash160(true),
            Network::Mainnet,
        ));

        let hash = sighash::signature_hash(tx, input_index, prev_lock.to_bytes(), self.sighash_flag)?;
        let signature = self
            .private_key
            .sign(&hash)
            .map_err(|e| TransactionError::SigningError(e.to_string()))?;

        let mut sig_buf = signature.to_der();
        sig_buf.push(self.sighash_flag as u8);

        let mut script = Script::new();
        script.append_push_data(&sig_buf)?;
        script.append_push_data(&pub_key.to_compressed())?;
        Ok(script)
    }
}
