//! Resolution of caller tokens into identities and destination addresses.
//!
//! A token is an existing [`Identity`], a 64 digit hex private key, a WIF,
//! or a file path. Files are hashed with SHA-256 and the digest becomes the
//! private key, so the same bytes always give the same identity.

use std::path::Path;
use std::sync::LazyLock;

use opensig_primitives::ec::PrivateKey;
use opensig_transaction::Address;
use regex::Regex;
use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::error::{OpenSigError, Result};
use crate::filesystem;
use crate::identity::Identity;

/// Byte appended to the hashed content on each retry.
pub const KEY_RETRY_MARKER: u8 = 0x00;

/// Number of digests tried before giving up on a file.
pub const KEY_DERIVATION_ATTEMPTS: usize = 3;

static PRIVATE_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]{64}$").expect("valid regex"));
static WIF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{51,52}$").expect("valid regex"));
static ADDRESS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{27,34}$").expect("valid regex"));
static CHAIN_ADDRESS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:OPENSIG-)?([1-9A-HJ-NP-Za-km-z]{27,34})-([A-Za-z0-9]+)$").expect("valid regex")
});

/// Something that can be resolved into an identity.
#[derive(Debug, Clone)]
pub enum Token {
    /// An already resolved identity.
    Identity(Identity),
    /// Text: a private key, WIF, address form or file path.
    Text(String),
}

impl From<Identity> for Token {
    fn from(identity: Identity) -> Self {
        Token::Identity(identity)
    }
}

impl From<&Identity> for Token {
    fn from(identity: &Identity) -> Self {
        Token::Identity(identity.clone())
    }
}

impl From<&str> for Token {
    fn from(text: &str) -> Self {
        Token::Text(text.to_string())
    }
}

impl From<String> for Token {
    fn from(text: String) -> Self {
        Token::Text(text)
    }
}

impl From<&Path> for Token {
    fn from(path: &Path) -> Self {
        Token::Text(path.to_string_lossy().into_owned())
    }
}

impl Token {
    /// Whether the token is empty text.
    pub fn is_empty(&self) -> bool {
        matches!(self, Token::Text(t) if t.is_empty())
    }
}

/// What a text token looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An already resolved identity.
    Identity,
    /// 64 hex digits.
    PrivateKey,
    /// Base58 text of WIF length.
    Wif,
    /// Anything else non-empty.
    FilePath,
    /// Nothing usable.
    Unrecognized,
}

/// Classify a token without constructing anything.
pub fn classify_token(token: &Token) -> TokenKind {
    match token {
        Token::Identity(_) => TokenKind::Identity,
        Token::Text(text) => classify_text(text),
    }
}

fn classify_text(text: &str) -> TokenKind {
    if text.trim().is_empty() {
        TokenKind::Unrecognized
    } else if PRIVATE_KEY_PATTERN.is_match(text) {
        TokenKind::PrivateKey
    } else if WIF_PATTERN.is_match(text) {
        TokenKind::Wif
    } else {
        TokenKind::FilePath
    }
}

/// Resolve `token` into an identity.
///
/// Private keys and WIFs that fail to decode are tried as file paths, so a
/// file whose name happens to look like a key can still be used.
pub async fn resolve_identity(token: Token) -> Result<Identity> {
    let kind = classify_token(&token);
    debug!(?kind, "resolving identity");
    let text = match token {
        Token::Identity(identity) => return Ok(identity),
        Token::Text(text) => text,
    };

    let direct = match kind {
        TokenKind::PrivateKey => PrivateKey::from_hex(&text).ok(),
        TokenKind::Wif => PrivateKey::from_wif(&text).ok(),
        TokenKind::Unrecognized => return Err(not_a_key(&text)),
        TokenKind::FilePath | TokenKind::Identity => None,
    };
    match direct {
        Some(key) => Ok(Identity::new(key, None)),
        None => identity_from_file(&text).await,
    }
}

fn not_a_key(token: &str) -> OpenSigError {
    OpenSigError::argument(format!(
        "argument '{token}' is not a private key, readable file or wif"
    ))
}

/// Hash the file at `path` into an identity labelled with the path.
///
/// A file that does not exist is an argument error; any other read failure
/// is a file system error.
pub async fn identity_from_file(path: &str) -> Result<Identity> {
    let state = hash_file(Path::new(path)).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            not_a_key(path)
        } else {
            filesystem::fs_error(&e, Path::new(path))
        }
    })?;
    let key = first_valid_key(retry_digests(&state))?;
    debug!(path, "derived identity from file");
    Ok(Identity::new(key, Some(path)))
}

async fn hash_file(path: &Path) -> std::io::Result<Sha256> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher)
}

/// Digests of the content followed by zero, one and two marker bytes.
pub fn retry_digests(content_state: &Sha256) -> impl Iterator<Item = [u8; 32]> + '_ {
    (0..KEY_DERIVATION_ATTEMPTS).map(move |extra| {
        let mut hasher = content_state.clone();
        hasher.update(vec![KEY_RETRY_MARKER; extra]);
        hasher.finalize().into()
    })
}

/// The first digest that is a valid secp256k1 scalar.
pub fn first_valid_key(candidates: impl IntoIterator<Item = [u8; 32]>) -> Result<PrivateKey> {
    let mut attempts = 0;
    for digest in candidates.into_iter().take(KEY_DERIVATION_ATTEMPTS) {
        attempts += 1;
        if let Ok(key) = PrivateKey::from_bytes(&digest) {
            return Ok(key);
        }
        debug!(attempt = attempts, "digest is not a valid private key, retrying");
    }
    Err(OpenSigError::internal(format!(
        "failed to generate a valid key after {attempts} attempts"
    )))
}

/// A destination address with the label it was given under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicAddress {
    /// Base58Check address.
    pub address: String,
    /// Label: the token for `<addr>-<chain>` forms, the identity label otherwise.
    pub label: Option<String>,
}

/// Resolve a destination token into an address.
///
/// Accepts a bare address, `<address>-<chain>`, `OPENSIG-<address>-<chain>`,
/// or any identity token.
pub async fn resolve_public_address(token: Token) -> Result<PublicAddress> {
    if let Token::Text(text) = &token {
        if ADDRESS_PATTERN.is_match(text) && Address::is_valid(text) {
            return Ok(PublicAddress {
                address: text.clone(),
                label: None,
            });
        }
        if let Some(caps) = CHAIN_ADDRESS_PATTERN.captures(text) {
            let address = &caps[1];
            if Address::is_valid(address) {
                return Ok(PublicAddress {
                    address: address.to_string(),
                    label: Some(text.clone()),
                });
            }
        }
    }

    let display = match &token {
        Token::Text(text) => text.clone(),
        Token::Identity(identity) => identity.public_key().to_string(),
    };
    match resolve_identity(token).await {
        Ok(identity) => Ok(PublicAddress {
            address: identity.public_key().to_string(),
            label: identity.label().map(str::to_string),
        }),
        Err(OpenSigError::Argument { .. }) => Err(OpenSigError::argument(format!(
            "argument '{display}' is not a public key, private key, readable file or wif"
        ))),
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_WORLD_KEY: &str = "d2a84f4b8b650937ec8f73cd8be2c74add5a911ba64df27458ed8229da804a26";
    const CURVE_ORDER: &str = "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";

    fn hello_world_file() -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello_world.txt");
        std::fs::write(&path, "Hello World\n").unwrap();
        (dir, path.to_string_lossy().into_owned())
    }

    #[test]
    fn test_classify_token() {
        assert_eq!(classify_token(&HELLO_WORLD_KEY.into()), TokenKind::PrivateKey);
        assert_eq!(
            classify_token(&"L4HCdx7tRz8F1azW9xUACNP2G4gnDoSdLZfJQm8MVEx9WEKwePct".into()),
            TokenKind::Wif
        );
        assert_eq!(
            classify_token(&"5KR4YUtriTY6SWTAn5QprFMrDvrLm8ob4XWXE61m4gQphACdYyz".into()),
            TokenKind::Wif
        );
        assert_eq!(classify_token(&"notes/readme.txt".into()), TokenKind::FilePath);
        assert_eq!(classify_token(&"".into()), TokenKind::Unrecognized);
        assert_eq!(classify_token(&Identity::random(None).into()), TokenKind::Identity);
    }

    #[test]
    fn test_retry_digests_append_one_marker_each() {
        let mut state = Sha256::new();
        state.update(b"Hello World\n");
        let digests: Vec<[u8; 32]> = retry_digests(&state).collect();

        assert_eq!(digests.len(), 3);
        assert_eq!(hex::encode(digests[0]), HELLO_WORLD_KEY);
        assert_eq!(
            hex::encode(digests[1]),
            "0e43503bad7986003585b0424d8d1f9c54c43fb9050dce3dc934643dbbaf0be2"
        );
        assert_eq!(
            hex::encode(digests[2]),
            "d80a2bad87a40060f11f195ee544e49a0af485ba34f95746649c1756c5fbe7bf"
        );
    }

    #[test]
    fn test_first_valid_key_skips_invalid_scalars() {
        let order: [u8; 32] = hex::decode(CURVE_ORDER).unwrap().try_into().unwrap();
        let valid: [u8; 32] = hex::decode(HELLO_WORLD_KEY).unwrap().try_into().unwrap();

        let key = first_valid_key([[0u8; 32], order, valid]).unwrap();
        assert_eq!(key.to_hex(), HELLO_WORLD_KEY);
    }

    #[test]
    fn test_first_valid_key_gives_up_after_three_attempts() {
        let order: [u8; 32] = hex::decode(CURVE_ORDER).unwrap().try_into().unwrap();
        let valid: [u8; 32] = hex::decode(HELLO_WORLD_KEY).unwrap().try_into().unwrap();

        let err = first_valid_key([[0u8; 32], order, [0xff; 32], valid]).unwrap_err();
        assert_eq!(err.code(), 100);
        assert_eq!(
            err.message(),
            "Internal Error! failed to generate a valid key after 3 attempts"
        );
    }

    #[tokio::test]
    async fn test_resolve_file_is_deterministic() {
        let (_dir, path) = hello_world_file();

        let first = resolve_identity(path.as_str().into()).await.unwrap();
        let second = resolve_identity(path.as_str().into()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.private_key_hex(), HELLO_WORLD_KEY);
        assert_eq!(first.public_key(), "13hCoaeW632HQHpzvMmiyNbVWk8Bfpvz14");
        assert_eq!(first.label(), Some(path.as_str()));
    }

    #[tokio::test]
    async fn test_resolve_keys_and_identity() {
        let from_hex = resolve_identity(HELLO_WORLD_KEY.into()).await.unwrap();
        let from_wif = resolve_identity("5KR4YUtriTY6SWTAn5QprFMrDvrLm8ob4XWXE61m4gQphACdYyz".into())
            .await
            .unwrap();
        assert_eq!(from_hex, from_wif);
        assert_eq!(from_hex.label(), None);

        let labelled = Identity::random(Some("mine"));
        let resolved = resolve_identity((&labelled).into()).await.unwrap();
        assert_eq!(resolved, labelled);
    }

    #[tokio::test]
    async fn test_resolve_missing_file_is_argument_error() {
        let err = resolve_identity("no/such/file.txt".into()).await.unwrap_err();
        assert_eq!(err.code(), 200);
        assert_eq!(
            err.message(),
            "argument 'no/such/file.txt' is not a private key, readable file or wif"
        );

        let err = resolve_identity("".into()).await.unwrap_err();
        assert_eq!(err.code(), 200);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolve_directory_is_file_system_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().into_owned();

        let err = resolve_identity(path.as_str().into()).await.unwrap_err();
        assert_eq!(err.code(), 300);
        assert_eq!(err.message(), format!("illegal operation on a directory {path}"));
    }

    #[tokio::test]
    async fn test_resolve_public_address_forms() {
        let bare = resolve_public_address("13hCoaeW632HQHpzvMmiyNbVWk8Bfpvz14".into())
            .await
            .unwrap();
        assert_eq!(bare.address, "13hCoaeW632HQHpzvMmiyNbVWk8Bfpvz14");
        assert_eq!(bare.label, None);

        let id = "OPENSIG-13hCoaeW632HQHpzvMmiyNbVWk8Bfpvz14-btc";
        let tagged = resolve_public_address(id.into()).await.unwrap();
        assert_eq!(tagged.address, "13hCoaeW632HQHpzvMmiyNbVWk8Bfpvz14");
        assert_eq!(tagged.label.as_deref(), Some(id));

        let short = resolve_public_address("13hCoaeW632HQHpzvMmiyNbVWk8Bfpvz14-btc".into())
            .await
            .unwrap();
        assert_eq!(short.address, "13hCoaeW632HQHpzvMmiyNbVWk8Bfpvz14");

        let (_dir, path) = hello_world_file();
        let file = resolve_public_address(path.as_str().into()).await.unwrap();
        assert_eq!(file.address, "13hCoaeW632HQHpzvMmiyNbVWk8Bfpvz14");
        assert_eq!(file.label.as_deref(), Some(path.as_str()));
    }

    #[tokio::test]
    async fn test_resolve_public_address_rejects_garbage() {
        let err = resolve_public_address("not-a-thing".into()).await.unwrap_err();
        assert_eq!(err.code(), 200);
        assert_eq!(
            err.message(),
            "argument 'not-a-thing' is not a public key, private key, readable file or wif"
        );
    }
}
