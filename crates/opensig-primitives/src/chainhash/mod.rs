//! Chain hash type for transaction identification.
//!
//! A `Hash` is 32 bytes stored in internal (little-endian) order and shown
//! byte-reversed, which is how ledgers and block explorers print txids.

use std::fmt;
use std::str::FromStr;

use crate::PrimitivesError;

/// Size of a Hash in bytes.
pub const HASH_SIZE: usize = 32;

/// Length of the display hex form of a Hash.
pub const HASH_STRING_SIZE: usize = HASH_SIZE * 2;

/// A 32-byte hash used for transaction ids.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    /// Create a Hash from 32 bytes in internal order.
    pub fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }

    /// Parse a Hash from its display (byte-reversed) hex form.
    ///
    /// Unlike a general hex decoder this accepts exactly 64 hex characters,
    /// so truncated or padded ids are rejected rather than zero-extended.
    ///
    /// # Arguments
    /// * `hex_str` - The 64-character display hex string.
    ///
    /// # Returns
    /// `Ok(Hash)` on success, or `InvalidHash` / `InvalidHex` otherwise.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.len() != HASH_STRING_SIZE {
            return Err(PrimitivesError::InvalidHash(format!(
                "expected {} hex characters, got {}",
                HASH_STRING_SIZE,
                hex_str.len()
            )));
        }
        let mut bytes = [0u8; HASH_SIZE];
        hex::decode_to_slice(hex_str, &mut bytes)?;
        bytes.reverse();
        Ok(Hash(bytes))
    }

    /// Borrow the internal-order bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }
}

impl fmt::Display for Hash {
    /// Display the hash as byte-reversed hex.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        write!(f, "{}", hex::encode(reversed))
    }
}

impl FromStr for Hash {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hash::from_hex(s)
    }
}
