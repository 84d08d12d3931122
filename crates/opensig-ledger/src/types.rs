//! Ledger data types: configuration, unspent outputs and signature records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A spendable output at some address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspentOutput {
    /// Display-order id of the transaction holding the output.
    pub id: String,
    /// Index of the output within that transaction.
    pub sequence_index: u32,
    /// Value in satoshis.
    pub value: u64,
}

impl UnspentOutput {
    /// Create an unspent output.
    pub fn new(id: impl Into<String>, sequence_index: u32, value: u64) -> Self {
        UnspentOutput {
            id: id.into(),
            sequence_index,
            value,
        }
    }
}

/// One ledger transaction paying into an identity's address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    /// When the transaction was seen by the ledger.
    pub time: DateTime<Utc>,
    /// Address of the transaction's first input.
    pub signer_address: String,
    /// Chain code of the ledger, e.g. `btc`.
    pub chain_code: String,
    /// Optional label.
    pub label: Option<String>,
}

/// Configuration for a [`BlockchainInfo`](crate::BlockchainInfo) gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockchainInfoConfig {
    /// Base URL of the API, without a trailing slash.
    pub base_url: String,
    /// Chain code stamped on every signature record.
    pub chain_code: String,
}

impl Default for BlockchainInfoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://blockchain.info".to_string(),
            chain_code: "btc".to_string(),
        }
    }
}
