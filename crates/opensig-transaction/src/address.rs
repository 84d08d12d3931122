/// Bitcoin P2PKH address handling.
///
/// Parses and produces Base58Check addresses and exposes the 20-byte
/// public key hash the P2PKH locking script commits to.

use std::fmt;

use opensig_primitives::base58;

use crate::TransactionError;

/// Mainnet P2PKH address version byte.
const MAINNET_P2PKH: u8 = 0x00;
/// Testnet P2PKH address version byte.
const TESTNET_P2PKH: u8 = 0x6f;

/// Bitcoin network type for address prefix selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    /// Mainnet (prefix 0x00, addresses start with '1').
    Mainnet,
    /// Testnet (prefix 0x6f, addresses start with 'm' or 'n').
    Testnet,
}

/// A P2PKH address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    /// The Base58Check address string.
    pub address_string: String,
    /// The 20-byte RIPEMD-160(SHA-256(pubkey)) hash.
    pub public_key_hash: [u8; 20],
    /// The network this address belongs to.
    pub network: Network,
}

impl Address {
    /// Parse a Base58Check-encoded address string.
    ///
    /// # Arguments
    /// * `addr` - The address string.
    ///
    /// # Returns
    /// An `Address`, or `InvalidAddress` for bad characters, a bad checksum,
    /// a wrong length or an unknown version byte.
    pub fn from_string(addr: &str) -> Result<Self, TransactionError> {
        let payload = base58::check_decode(addr)
            .map_err(|e| TransactionError::InvalidAddress(format!("'{}': {}", addr, e)))?;

        if payload.len() != 21 {
            return Err(TransactionError::InvalidAddress(format!(
                "'{}': invalid length",
                addr
            )));
        }

        let network = match payload[0] {
            MAINNET_P2PKH => Network::Mainnet,
            TESTNET_P2PKH => Network::Testnet,
            v => {
                return Err(TransactionError::InvalidAddress(format!(
                    "'{}': unsupported version byte 0x{:02x}",
                    addr, v
                )))
            }
        };

        let mut public_key_hash = [0u8; 20];
        public_key_hash.copy_from_slice(&payload[1..]);

        Ok(Address {
            address_string: addr.to_string(),
            public_key_hash,
            network,
        })
    }

    /// Create an address from a 20-byte public key hash.
    pub fn from_public_key_hash(hash: &[u8; 20], network: Network) -> Self {
        let version = match network {
            Network::Mainnet => MAINNET_P2PKH,
            Network::Testnet => TESTNET_P2PKH,
        };
        let mut payload = Vec::with_capacity(21);
        payload.push(version);
        payload.extend_from_slice(hash);

        Address {
            address_string: base58::check_encode(&payload),
            public_key_hash: *hash,
            network,
        }
    }

    /// Whether `addr` is a well-formed P2PKH address on either network.
    pub fn is_valid(addr: &str) -> bool {
        Self::from_string(addr).is_ok()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_string)
    }
}
