/// OpenSig primitives - hashing, encoding and secp256k1 keys.
///
/// This crate provides the building blocks the rest of OpenSig is made of:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
/// - Chain hash type for transaction identifiers
/// - Elliptic curve cryptography (secp256k1 keys and ECDSA signatures)
/// - Variable-length integer encoding and a wire-format writer
/// - Base58 and Base58Check encoding

pub mod hash;
pub mod chainhash;
pub mod util;
pub mod base58;
pub mod ec;

mod error;
pub use error::PrimitivesError;
