//! Bitcoin script as a byte vector newtype.
//!
//! Only the pieces P2PKH needs live here: opcode constants, push-data
//! encoding and hex output.

use std::fmt;

use crate::TransactionError;

/// Duplicate the top stack item.
pub const OP_DUP: u8 = 0x76;
/// Hash the top stack item with RIPEMD-160(SHA-256).
pub const OP_HASH160: u8 = 0xa9;
/// Push the next 20 bytes.
pub const OP_DATA_20: u8 = 0x14;
/// Fail unless the top two items are equal.
pub const OP_EQUALVERIFY: u8 = 0x88;
/// Check an ECDSA signature against a public key.
pub const OP_CHECKSIG: u8 = 0xac;
/// Push data with a 1-byte length.
pub const OP_PUSHDATA1: u8 = 0x4c;
/// Push data with a 2-byte length.
pub const OP_PUSHDATA2: u8 = 0x4d;
/// Push data with a 4-byte length.
pub const OP_PUSHDATA4: u8 = 0x4e;

/// A Bitcoin script.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Script(Vec<u8>);

impl Script {
    /// Create an empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Create a script from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Borrow the raw script bytes.
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Hex-encode the script.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Length of the script in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the script has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append data with the minimal push prefix.
    ///
    /// Direct push for 1-75 bytes, then OP_PUSHDATA1/2/4.
    ///
    /// # Arguments
    /// * `data` - The bytes to push.
    ///
    /// # Returns
    /// `Ok(())`, or a script error if the data is empty or exceeds 4 GiB.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<(), TransactionError> {
        let len = data.len();
        match len {
            0 => {
                return Err(TransactionError::Script(
                    "refusing to push empty data".to_string(),
                ))
            }
            1..=75 => self.0.push(len as u8),
            76..=0xff => {
                self.0.push(OP_PUSHDATA1);
                self.0.push(len as u8);
            }
            0x100..=0xffff => {
                self.0.push(OP_PUSHDATA2);
                self.0.extend_from_slice(&(len as u16).to_le_bytes());
            }
            _ => {
                let len = u32::try_from(len).map_err(|_| {
                    TransactionError::Script(format!("data too big: {} bytes", data.len()))
                })?;
                self.0.push(OP_PUSHDATA4);
                self.0.extend_from_slice(&len.to_le_bytes());
            }
        }
        self.0.extend_from_slice(data);
        Ok(())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_prefixes() {
        let mut s = Script::new();
        s.append_push_data(&[0xab; 33]).unwrap();
        assert_eq!(s.to_bytes()[0], 33);
        assert_eq!(s.len(), 34);

        let mut s = Script::new();
        s.append_push_data(&[0; 76]).unwrap();
        assert_eq!(&s.to_bytes()[..2], &[OP_PUSHDATA1, 76]);

        let mut s = Script::new();
        s.append_push_data(&[0; 256]).unwrap();
        assert_eq!(&s.to_bytes()[..3], &[OP_PUSHDATA2, 0x00, 0x01]);
    }

    #[test]
    fn test_push_empty_is_rejected() {
        assert!(Script::new().append_push_data(&[]).is_err());
    }
}
