//! blockchain.info gateway.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::{LedgerError, LedgerFailure, RequestContext};
use crate::gateway::LedgerGateway;
use crate::transport::{Transport, TransportStrategy};
use crate::types::{BlockchainInfoConfig, SignatureRecord, UnspentOutput};

#[derive(Debug, Deserialize)]
struct AddressResponse {
    #[serde(default)]
    txs: Vec<AddressTransaction>,
}

#[derive(Debug, Deserialize)]
struct AddressTransaction {
    time: i64,
    #[serde(default)]
    inputs: Vec<TransactionInput>,
    #[serde(default)]
    out: Vec<TransactionOutput>,
}

#[derive(Debug, Deserialize)]
struct TransactionInput {
    prev_out: Option<TransactionOutput>,
}

#[derive(Debug, Deserialize)]
struct TransactionOutput {
    addr: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UnspentResponse {
    #[serde(default)]
    unspent_outputs: Vec<UnspentEntry>,
}

#[derive(Debug, Deserialize)]
struct UnspentEntry {
    tx_hash_big_endian: String,
    tx_output_n: u32,
    value: u64,
}

/// Ledger gateway backed by the blockchain.info REST API.
#[derive(Debug)]
pub struct BlockchainInfo<T: Transport = TransportStrategy> {
    config: BlockchainInfoConfig,
    transport: T,
}

impl<T: Transport> BlockchainInfo<T> {
    /// Create a gateway using `transport` for all traffic.
    pub fn new(config: BlockchainInfoConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// The gateway configuration.
    pub fn config(&self) -> &BlockchainInfoConfig {
        &self.config
    }

    /// The transport in use.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `url` and deserialize the JSON body.
    async fn get_json<R: DeserializeOwned>(&self, url: String) -> Result<R, LedgerFailure> {
        let request = RequestContext::get(url);
        let body = self.get_text(&request).await?;
        serde_json::from_str(&body).map_err(|e| {
            LedgerFailure::new(
                request,
                LedgerError::InvalidResponse {
                    body,
                    reason: e.to_string(),
                },
            )
        })
    }

    async fn get_text(&self, request: &RequestContext) -> Result<String, LedgerFailure> {
        debug!(url = %request.url, "querying ledger");
        self.transport
            .get(&request.url)
            .await
            .map_err(|e| LedgerFailure::new(request.clone(), e))
    }
}

/// Reduce an address listing to one record per transaction paying `address`.
fn signature_records(
    response: AddressResponse,
    address: &str,
    chain_code: &str,
) -> Vec<SignatureRecord> {
    response
        .txs
        .into_iter()
        .filter(|tx| tx.out.iter().any(|o| o.addr.as_deref() == Some(address)))
        .filter_map(|tx| {
            // Only the first input is taken as the signer.
            let signer = tx.inputs.first()?.prev_out.as_ref()?.addr.clone()?;
            let time = DateTime::<Utc>::from_timestamp(tx.time, 0)?;
            Some(SignatureRecord {
                time,
                signer_address: signer,
                chain_code: chain_code.to_string(),
                label: None,
            })
        })
        .collect()
}

impl<T: Transport> LedgerGateway for BlockchainInfo<T> {
    async fn query_transactions(&self, address: &str) -> Result<Vec<SignatureRecord>, LedgerFailure> {
        let url = format!("{}/address/{}?format=json", self.config.base_url, address);
        let response: AddressResponse = self.get_json(url).await?;
        Ok(signature_records(response, address, &self.config.chain_code))
    }

    async fn query_unspent_outputs(&self, address: &str) -> Result<Vec<UnspentOutput>, LedgerFailure> {
        let url = format!("{}/unspent?active={}", self.config.base_url, address);
        let response: UnspentResponse = self.get_json(url).await?;
        Ok(response
            .unspent_outputs
            .into_iter()
            .map(|u| UnspentOutput::new(u.tx_hash_big_endian, u.tx_output_n, u.value))
            .collect())
    }

    async fn query_balance(&self, address: &str) -> Result<u64, LedgerFailure> {
        let request = RequestContext::get(format!(
            "{}/q/addressbalance/{}",
            self.config.base_url, address
        ));
        let body = self.get_text(&request).await?;
        body.trim().parse::<u64>().map_err(|e| {
            LedgerFailure::new(
                request,
                LedgerError::InvalidResponse {
                    body: body.clone(),
                    reason: e.to_string(),
                },
            )
        })
    }

    async fn publish(&self, transaction_hex: &str) -> Result<String, LedgerFailure> {
        let url = format!("{}/pushtx", self.config.base_url);
        let request = RequestContext::post(url, format!("tx={transaction_hex}"));
        debug!(url = %request.url, "publishing transaction");
        self.transport
            .post_form(&request.url, "tx", transaction_hex)
            .await
            .map_err(|e| LedgerFailure::new(request, e))
    }
}
