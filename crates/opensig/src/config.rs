//! Configuration for OpenSig
//!
//! ```toml
//! minimum_payment = 5430
//! minimum_fee = 10000
//!
//! [ledger]
//! base_url = "https://blockchain.info"
//! chain_code = "btc"
//!
//! [ledger.transport]
//! mode = "fixture"
//! directory = "tests/fixtures/sign"
//! ```

use std::path::{Path, PathBuf};

use opensig_ledger::{BlockchainInfoConfig, TransportStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{OpenSigError, Result};
use crate::filesystem;

/// Default payment for a signature, in satoshis.
pub const MINIMUM_PAYMENT: u64 = 5430;

/// Default miner's fee, in satoshis.
pub const MINIMUM_FEE: u64 = 10000;

/// Top level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenSigConfig {
    /// Payment used by `sign` when none is given.
    pub minimum_payment: u64,

    /// Fee used by `sign` and `send` when none is given.
    pub minimum_fee: u64,

    /// Ledger access
    pub ledger: LedgerConfig,
}

impl Default for OpenSigConfig {
    fn default() -> Self {
        Self {
            minimum_payment: MINIMUM_PAYMENT,
            minimum_fee: MINIMUM_FEE,
            ledger: LedgerConfig::default(),
        }
    }
}

/// Ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// API base URL
    pub base_url: String,

    /// Chain code stamped on signature records
    pub chain_code: String,

    /// Which transport to use
    pub transport: TransportMode,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        let gateway = BlockchainInfoConfig::default();
        Self {
            base_url: gateway.base_url,
            chain_code: gateway.chain_code,
            transport: TransportMode::Live,
        }
    }
}

impl LedgerConfig {
    /// Gateway settings.
    pub fn gateway_config(&self) -> BlockchainInfoConfig {
        BlockchainInfoConfig {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            chain_code: self.chain_code.clone(),
        }
    }
}

/// Transport selection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum TransportMode {
    /// Live HTTP
    #[default]
    Live,
    /// Recorded `testURLResponse<N>` files
    Fixture {
        /// Directory holding the fixture files
        directory: PathBuf,
    },
}

impl TransportMode {
    /// Build the transport this mode describes.
    pub fn strategy(&self) -> TransportStrategy {
        match self {
            TransportMode::Live => TransportStrategy::http(),
            TransportMode::Fixture { directory } => TransportStrategy::fixture(directory.clone()),
        }
    }
}

impl OpenSigConfig {
    /// Parse TOML text; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text)
            .map_err(|e| OpenSigError::argument(format!("invalid configuration: {}", e.message())))
    }

    /// Load from file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| filesystem::fs_error(&e, path))?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OpenSigConfig::from_toml_str("").unwrap();
        assert_eq!(config, OpenSigConfig::default());
        assert_eq!(config.minimum_payment, 5430);
        assert_eq!(config.minimum_fee, 10000);
        assert_eq!(config.ledger.base_url, "https://blockchain.info");
        assert_eq!(config.ledger.transport, TransportMode::Live);
    }

    #[test]
    fn test_fixture_mode() {
        let config = OpenSigConfig::from_toml_str(
            r#"
            minimum_fee = 2000

            [ledger]
            base_url = "http://localhost:8080/"

            [ledger.transport]
            mode = "fixture"
            directory = "fixtures/sign"
            "#,
        )
        .unwrap();

        assert_eq!(config.minimum_fee, 2000);
        assert_eq!(config.minimum_payment, 5430);
        assert_eq!(config.ledger.gateway_config().base_url, "http://localhost:8080");
        assert_eq!(config.ledger.chain_code, "btc");
        assert_eq!(
            config.ledger.transport,
            TransportMode::Fixture { directory: PathBuf::from("fixtures/sign") }
        );
        assert!(config.ledger.transport.strategy().is_fixture());
    }

    #[test]
    fn test_invalid_config() {
        let err = OpenSigConfig::from_toml_str("minimum_fee = \"cheap\"").unwrap_err();
        assert_eq!(err.code(), 200);
        assert!(err.message().starts_with("invalid configuration"));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opensig.toml");
        std::fs::write(&path, "minimum_payment = 6000\n").unwrap();

        let config = OpenSigConfig::load(&path).await.unwrap();
        assert_eq!(config.minimum_payment, 6000);

        let err = OpenSigConfig::load(dir.path().join("missing.toml")).await.unwrap_err();
        assert_eq!(err.code(), 300);
    }
}
