//! Base58 and Base58Check encoding.
//!
//! Base58Check (payload followed by the first four bytes of its SHA-256d)
//! is the envelope used by both WIF private keys and P2PKH addresses.

use crate::hash::sha256d;
use crate::PrimitivesError;

/// Length of the Base58Check checksum suffix.
pub const CHECKSUM_LEN: usize = 4;

/// Encode a byte slice to a Base58 string using the Bitcoin alphabet.
///
/// Leading zero bytes are encoded as leading '1' characters.
pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).with_alphabet(bs58::Alphabet::BITCOIN).into_string()
}

/// Decode a Base58 string to a byte vector.
///
/// # Returns
/// `Ok(Vec<u8>)` on success, or an error for characters outside the alphabet.
pub fn decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    bs58::decode(s)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_vec()
        .map_err(|e| PrimitivesError::InvalidBase58(e.to_string()))
}

/// Encode a payload with its 4-byte double-SHA-256 checksum appended.
///
/// # Arguments
/// * `data` - Version byte followed by the payload.
///
/// # Returns
/// A Base58Check-encoded string.
pub fn check_encode(data: &[u8]) -> String {
    let checksum = sha256d(data);
    let mut payload = Vec::with_capacity(data.len() + CHECKSUM_LEN);
    payload.extend_from_slice(data);
    payload.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    encode(&payload)
}

/// Decode a Base58Check string and verify its checksum.
///
/// # Arguments
/// * `s` - The Base58Check string to decode.
///
/// # Returns
/// The payload (version byte included, checksum stripped), or an error for
/// invalid characters, short input, or a checksum mismatch.
pub fn check_decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    let decoded = decode(s)?;
    if decoded.len() < CHECKSUM_LEN {
        return Err(PrimitivesError::InvalidBase58(
            "data too short for checksum".to_string(),
        ));
    }
    let (payload, checksum) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
    if checksum != &sha256d(payload)[..CHECKSUM_LEN] {
        return Err(PrimitivesError::ChecksumMismatch);
    }
    Ok(payload.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base58_leading_zeros() {
        let input = hex::decode("000000287FB4CD").unwrap();
        assert_eq!(encode(&input), "111233QC4");
        assert_eq!(decode("111233QC4").unwrap(), input);
    }

    #[test]
    fn test_base58_rejects_characters_outside_alphabet() {
        // 0, O, I and l are not part of the alphabet
        assert!(decode("0OIl").is_err());
        assert!(decode("13hCoaeW632HQHpzvMmiyNbVWk8Bfpvz1!").is_err());
    }

    #[test]
    fn test_check_decode_address() {
        let payload = check_decode("1M9jofAErijG4eiPUy19Qxot1KkPRRzyet").unwrap();
        assert_eq!(payload.len(), 21);
        assert_eq!(payload[0], 0x00);
        assert_eq!(hex::encode(&payload[1..]), "dd09932106e2fd0f296b726da9cb5cf142648e95");
        assert_eq!(check_encode(&payload), "1M9jofAErijG4eiPUy19Qxot1KkPRRzyet");
    }

    #[test]
    fn test_check_decode_bad_checksum() {
        // last character changed
        assert!(matches!(
            check_decode("1M9jofAErijG4eiPUy19Qxot1KkPRRzyeu"),
            Err(PrimitivesError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_check_decode_too_short() {
        assert!(check_decode("1").is_err());
    }
}
