//! secp256k1 public key with P2PKH address derivation.
//!
//! Identities carry both the compressed and the uncompressed form, each
//! of which hashes to its own address.

use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use std::fmt;

use crate::base58;
use crate::ec::signature::Signature;
use crate::hash::hash160;
use crate::PrimitivesError;

/// Length of a compressed public key in bytes (prefix + x-coordinate).
pub const COMPRESSED_LEN: usize = 33;

/// Length of an uncompressed public key in bytes (prefix + x + y).
pub const UNCOMPRESSED_LEN: usize = 65;

/// Mainnet P2PKH address version byte.
pub const MAINNET_ADDRESS_PREFIX: u8 = 0x00;

/// A secp256k1 public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    inner: VerifyingKey,
}

impl PublicKey {
    /// Create a PublicKey from SEC1 encoded bytes (33 or 65 bytes).
    ///
    /// # Returns
    /// `Ok(PublicKey)` on success, or `InvalidPublicKey` if the bytes are
    /// empty or not a point on the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.is_empty() {
            return Err(PrimitivesError::InvalidPublicKey(
                "pubkey bytes are empty".to_string(),
            ));
        }
        let inner = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|e| PrimitivesError::InvalidPublicKey(e.to_string()))?;
        Ok(PublicKey { inner })
    }

    /// Create a PublicKey from a hex-encoded SEC1 string.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        Self::from_bytes(&hex::decode(hex_str)?)
    }

    pub(crate) fn from_k256_verifying_key(vk: &VerifyingKey) -> Self {
        PublicKey { inner: vk.clone() }
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.inner
    }

    /// Serialize in compressed SEC1 format: `0x02`/`0x03` followed by x.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_LEN] {
        let point = self.inner.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Serialize in uncompressed SEC1 format: `0x04` followed by x and y.
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_LEN] {
        let point = self.inner.to_encoded_point(false);
        let mut out = [0u8; UNCOMPRESSED_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Serialize the compressed form as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }

    /// Compute Hash160 of the chosen serialization.
    ///
    /// # Arguments
    /// * `compressed` - Hash the 33-byte form when true, the 65-byte form otherwise.
    ///
    /// # Returns
    /// The 20-byte public key hash.
    pub fn hash160(&self, compressed: bool) -> [u8; 20] {
        if compressed {
            hash160(&self.to_compressed())
        } else {
            hash160(&self.to_uncompressed())
        }
    }

    /// Derive the mainnet P2PKH address for the chosen serialization.
    ///
    /// # Arguments
    /// * `compressed` - Whether the address commits to the compressed key.
    ///
    /// # Returns
    /// A Base58Check-encoded address string.
    pub fn to_address(&self, compressed: bool) -> String {
        let mut payload = Vec::with_capacity(21);
        payload.push(MAINNET_ADDRESS_PREFIX);
        payload.extend_from_slice(&self.hash160(compressed));
        base58::check_encode(&payload)
    }

    /// Verify an ECDSA signature over a message hash.
    pub fn verify(&self, hash: &[u8], sig: &Signature) -> bool {
        sig.verify(hash, self)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
