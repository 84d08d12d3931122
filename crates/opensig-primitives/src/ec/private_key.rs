//! secp256k1 private key with WIF support.
//!
//! Wraps the k256 signing key and adds compressed and uncompressed WIF
//! encoding, which identities expose side by side.

use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::base58;
use crate::ec::public_key::PublicKey;
use crate::ec::signature::Signature;
use crate::PrimitivesError;

/// Length of a serialized private key in bytes.
pub const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// Mainnet WIF version byte.
pub const MAINNET_WIF_PREFIX: u8 = 0x80;

/// Flag byte appended to a WIF payload when the public key is compressed.
const COMPRESS_MAGIC: u8 = 0x01;

/// A secp256k1 private key.
///
/// Always holds a scalar in `[1, n-1]`; constructors reject anything else.
#[derive(Clone, Debug)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Generate a new random private key using the OS random number generator.
    pub fn new() -> Self {
        PrivateKey {
            inner: SigningKey::random(&mut OsRng),
        }
    }

    /// Create a private key from a raw 32-byte big-endian scalar.
    ///
    /// # Arguments
    /// * `bytes` - A 32-byte slice.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` if the scalar is on the curve, or `InvalidPrivateKey`
    /// if it has the wrong length, is zero, or is not below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_BYTES_LEN,
                bytes.len()
            )));
        }
        let inner = SigningKey::from_bytes(bytes.into())
            .map_err(|_| PrivateKey::out_of_range())?;
        Ok(PrivateKey { inner })
    }

    /// Create a private key from a 64-character hexadecimal string.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Err(PrimitivesError::InvalidPrivateKey(
                "private key hex is empty".to_string(),
            ));
        }
        let mut bytes = hex::decode(hex_str)?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    /// Create a private key from a WIF string, discarding the compression flag.
    pub fn from_wif(wif: &str) -> Result<Self, PrimitivesError> {
        Self::decode_wif(wif).map(|(key, _)| key)
    }

    /// Decode a WIF (Wallet Import Format) string.
    ///
    /// A 38-byte payload (version, key, `0x01`, checksum) denotes a
    /// compressed key; a 37-byte payload denotes an uncompressed one.
    ///
    /// # Arguments
    /// * `wif` - A Base58Check-encoded mainnet WIF string.
    ///
    /// # Returns
    /// The key together with `true` when the WIF was the compressed form,
    /// or an error for a bad checksum, version byte, length or scalar.
    pub fn decode_wif(wif: &str) -> Result<(Self, bool), PrimitivesError> {
        let mut payload = base58::check_decode(wif).map_err(|e| match e {
            PrimitivesError::ChecksumMismatch => e,
            other => PrimitivesError::InvalidWif(other.to_string()),
        })?;

        let result = Self::from_wif_payload(&payload);
        payload.zeroize();
        result
    }

    fn from_wif_payload(payload: &[u8]) -> Result<(Self, bool), PrimitivesError> {
        let compressed = match payload.len() {
            34 if payload[33] == COMPRESS_MAGIC => true,
            34 => {
                return Err(PrimitivesError::InvalidWif(
                    "malformed private key: invalid compression flag".to_string(),
                ))
            }
            33 => false,
            n => {
                return Err(PrimitivesError::InvalidWif(format!(
                    "malformed private key: invalid length {}",
                    n + base58::CHECKSUM_LEN
                )))
            }
        };
        if payload[0] != MAINNET_WIF_PREFIX {
            return Err(PrimitivesError::InvalidWif(format!(
                "unsupported version byte 0x{:02x}",
                payload[0]
            )));
        }
        let key = Self::from_bytes(&payload[1..1 + PRIVATE_KEY_BYTES_LEN])?;
        Ok((key, compressed))
    }

    /// Encode as a mainnet WIF for the compressed public key form.
    pub fn to_wif_compressed(&self) -> String {
        self.to_wif_prefix(MAINNET_WIF_PREFIX, true)
    }

    /// Encode as a mainnet WIF for the uncompressed public key form.
    pub fn to_wif_uncompressed(&self) -> String {
        self.to_wif_prefix(MAINNET_WIF_PREFIX, false)
    }

    /// Encode as a WIF string with a custom version byte.
    ///
    /// # Arguments
    /// * `prefix` - The network version byte (0x80 for mainnet).
    /// * `compressed` - Whether to append the compression flag.
    ///
    /// # Returns
    /// A Base58Check-encoded WIF string.
    pub fn to_wif_prefix(&self, prefix: u8, compressed: bool) -> String {
        let mut payload = Vec::with_capacity(1 + PRIVATE_KEY_BYTES_LEN + 1);
        payload.push(prefix);
        payload.extend_from_slice(&self.to_bytes());
        if compressed {
            payload.push(COMPRESS_MAGIC);
        }
        let wif = base58::check_encode(&payload);
        payload.zeroize();
        wif
    }

    /// Serialize the private key as a 32-byte big-endian array.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_BYTES_LEN] {
        self.inner.to_bytes().into()
    }

    /// Serialize the private key as a lowercase 64-character hex string.
    pub fn to_hex(&self) -> String {
        let mut bytes = self.to_bytes();
        let out = hex::encode(bytes);
        bytes.zeroize();
        out
    }

    /// Derive the corresponding public key.
    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_k256_verifying_key(self.inner.verifying_key())
    }

    /// Sign a 32-byte message hash with a deterministic RFC6979 nonce.
    ///
    /// The resulting signature is low-S normalized.
    pub fn sign(&self, hash: &[u8]) -> Result<Signature, PrimitivesError> {
        Signature::sign(hash, self)
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }

    fn out_of_range() -> PrimitivesError {
        PrimitivesError::InvalidPrivateKey(
            "scalar must be non-zero and below the curve order".to_string(),
        )
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_KEY: &str = "d2a84f4b8b650937ec8f73cd8be2c74add5a911ba64df27458ed8229da804a26";
    const HELLO_WIF_COMPRESSED: &str = "L4HCdx7tRz8F1azW9xUACNP2G4gnDoSdLZfJQm8MVEx9WEKwePct";
    const HELLO_WIF_UNCOMPRESSED: &str = "5KR4YUtriTY6SWTAn5QprFMrDvrLm8ob4XWXE61m4gQphACdYyz";

    #[test]
    fn test_wif_encodings() {
        let key = PrivateKey::from_hex(HELLO_KEY).unwrap();
        assert_eq!(key.to_wif_compressed(), HELLO_WIF_COMPRESSED);
        assert_eq!(key.to_wif_uncompressed(), HELLO_WIF_UNCOMPRESSED);
        assert_eq!(key.to_hex(), HELLO_KEY);
    }

    #[test]
    fn test_decode_wif_reports_compression() {
        let (compressed, flag) = PrivateKey::decode_wif(HELLO_WIF_COMPRESSED).unwrap();
        assert!(flag);
        assert_eq!(compressed.to_hex(), HELLO_KEY);

        let (uncompressed, flag) = PrivateKey::decode_wif(HELLO_WIF_UNCOMPRESSED).unwrap();
        assert!(!flag);
        assert_eq!(uncompressed, compressed);
    }

    #[test]
    fn test_from_bytes_rejects_out_of_range_scalars() {
        assert!(PrivateKey::from_bytes(&[0u8; 32]).is_err());
        assert!(PrivateKey::from_bytes(&[0xffu8; 32]).is_err());
        // the curve order itself
        let n = hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141").unwrap();
        assert!(PrivateKey::from_bytes(&n).is_err());
        assert!(PrivateKey::from_bytes(&[1u8; 31]).is_err());
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(PrivateKey::from_hex("").is_err());
        assert!(PrivateKey::from_hex(HELLO_WIF_COMPRESSED).is_err());
    }

    #[test]
    fn test_decode_wif_invalid() {
        // modified character
        assert!(PrivateKey::decode_wif("L4HCdx7tRz8F1azW9xUACNP2G4gnDoSdLZfJQm8MVEx9WEKwePcu").is_err());
        // truncated
        assert!(PrivateKey::decode_wif("L4HCdx7tRz8F1azW9xUACNP2G4gnDoSdLZfJQm8MVEx9WEKwePc").is_err());
        // an address has the right checksum but the wrong shape
        assert!(PrivateKey::decode_wif("1M9jofAErijG4eiPUy19Qxot1KkPRRzyet").is_err());
    }

    #[test]
    fn test_random_keys_roundtrip_through_wif() {
        let key = PrivateKey::new();
        assert_eq!(PrivateKey::from_wif(&key.to_wif_compressed()).unwrap(), key);
        assert_eq!(PrivateKey::from_wif(&key.to_wif_uncompressed()).unwrap(), key);
    }
}
