//! The OpenSig operations: verify, sign, send and balance.
//!
//! A send runs through these stages in order, failing out of any of them:
//!
//! ```text
//! ResolvingSource -> ResolvingDestination -> FetchingOutputs -> SelectingInputs
//!   -> BuildingTransaction -> SigningInputs -> Built -> Publishing | NotPublished
//! ```
//!
//! Concurrent sends from one address each fetch their own unspent outputs
//! and may try to spend the same one; nothing here prevents that.

use opensig_ledger::{BlockchainInfo, LedgerGateway, SignatureRecord, UnspentOutput};
use opensig_transaction::TransactionBuilder;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::config::{OpenSigConfig, MINIMUM_FEE, MINIMUM_PAYMENT};
use crate::deriver::{resolve_identity, resolve_public_address, Token};
use crate::error::{OpenSigError, Result};
use crate::identity::Identity;
use crate::receipt::{PublishResponse, Receipt, ReceiptDraft};
use crate::selector::{select, InputSelection, Payment};

/// Pipeline stage, used for log context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Resolving the paying identity.
    ResolvingSource,
    /// Resolving the destination address.
    ResolvingDestination,
    /// Fetching unspent outputs of the source.
    FetchingOutputs,
    /// Running coin selection.
    SelectingInputs,
    /// Adding inputs and outputs.
    BuildingTransaction,
    /// Signing every input.
    SigningInputs,
    /// Transaction serialized.
    Built,
    /// Submitting to the ledger.
    Publishing,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::ResolvingSource => "resolving-source",
            Stage::ResolvingDestination => "resolving-destination",
            Stage::FetchingOutputs => "fetching-outputs",
            Stage::SelectingInputs => "selecting-inputs",
            Stage::BuildingTransaction => "building-transaction",
            Stage::SigningInputs => "signing-inputs",
            Stage::Built => "built",
            Stage::Publishing => "publishing",
        };
        f.write_str(name)
    }
}

fn failed(stage: Stage, err: OpenSigError) -> OpenSigError {
    warn!(%stage, code = err.code(), error = %err, "operation failed");
    err
}

/// Options for [`OpenSig::sign`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignOptions {
    /// Publish the transaction once built.
    pub publish: bool,
    /// Payment to the file's address; the configured minimum when `None`.
    pub payment: Option<u64>,
    /// Miner's fee; the configured minimum when `None`.
    pub fee: Option<u64>,
}

/// Options for [`OpenSig::send`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Miner's fee; the configured minimum when `None`.
    pub fee: Option<u64>,
    /// Publish the transaction once built.
    pub publish: bool,
}

/// Entry point for every OpenSig operation.
///
/// Holds its ledger gateway, and with it the transport, for its whole
/// lifetime. Operations share no other state.
#[derive(Debug)]
pub struct OpenSig<G: LedgerGateway = BlockchainInfo> {
    gateway: G,
    minimum_payment: u64,
    minimum_fee: u64,
}

impl OpenSig<BlockchainInfo> {
    /// Build a blockchain.info backed instance from configuration.
    pub fn from_config(config: &OpenSigConfig) -> Self {
        let gateway = BlockchainInfo::new(
            config.ledger.gateway_config(),
            config.ledger.transport.strategy(),
        );
        Self::with_defaults(gateway, config.minimum_payment, config.minimum_fee)
    }
}

impl<G: LedgerGateway> OpenSig<G> {
    /// Use `gateway` with the standard payment and fee.
    pub fn new(gateway: G) -> Self {
        Self::with_defaults(gateway, MINIMUM_PAYMENT, MINIMUM_FEE)
    }

    /// Use `gateway` with the given default payment and fee.
    pub fn with_defaults(gateway: G, minimum_payment: u64, minimum_fee: u64) -> Self {
        Self {
            gateway,
            minimum_payment,
            minimum_fee,
        }
    }

    /// The ledger gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Every signature recorded against `file`.
    ///
    /// # Arguments
    /// * `file` - Any identity token; usually a file path.
    ///
    /// # Returns
    /// One record per ledger transaction paying the file's address, possibly
    /// none. Each record names the transaction's first input as the signer.
    #[instrument(skip_all)]
    pub async fn verify(&self, file: impl Into<Token>) -> Result<Vec<SignatureRecord>> {
        let file = file.into();
        if file.is_empty() {
            return Err(OpenSigError::argument("file argument is missing"));
        }
        let identity = resolve_identity(file)
            .await
            .map_err(|e| failed(Stage::ResolvingSource, e))?;
        let records = self
            .gateway
            .query_transactions(identity.public_key())
            .await
            .map_err(|e| failed(Stage::FetchingOutputs, e.into()))?;
        info!(address = identity.public_key(), signatures = records.len(), "verified");
        Ok(records)
    }

    /// Sign `file` with `key`: pay a small amount from the key's address to
    /// the file's address.
    ///
    /// # Arguments
    /// * `file` - The file (or any identity token) being signed.
    /// * `key` - The signer's private key, WIF, identity or key file.
    /// * `options` - Publication, payment and fee.
    #[instrument(skip_all, fields(publish = options.publish))]
    pub async fn sign(
        &self,
        file: impl Into<Token>,
        key: impl Into<Token>,
        options: SignOptions,
    ) -> Result<Receipt> {
        let file = file.into();
        if file.is_empty() {
            return Err(OpenSigError::argument("file argument is missing"));
        }
        let key = key.into();
        if key.is_empty() {
            return Err(OpenSigError::argument("key argument is missing"));
        }
        let payment = options.payment.unwrap_or(self.minimum_payment);
        if payment == 0 {
            return Err(OpenSigError::argument("invalid payment amount '0'"));
        }
        let send = SendOptions {
            fee: options.fee,
            publish: options.publish,
        };
        self.send(key, file, Payment::Amount(payment), send).await
    }

    /// Send `payment` from `from` to `to`.
    ///
    /// # Arguments
    /// * `from` - Private key, WIF, identity or key file paying.
    /// * `to` - Address, `<address>-<chain>`, `OPENSIG-<address>-<chain>` or identity token.
    /// * `payment` - Satoshis, or everything held by `from` less the fee.
    /// * `options` - Fee and publication.
    ///
    /// # Returns
    /// The receipt, with `response` set to the ledger's answer or `Not Published`.
    #[instrument(skip_all, fields(%payment, publish = options.publish))]
    pub async fn send(
        &self,
        from: impl Into<Token>,
        to: impl Into<Token>,
        payment: Payment,
        options: SendOptions,
    ) -> Result<Receipt> {
        let from = from.into();
        if from.is_empty() {
            return Err(OpenSigError::argument("from argument is missing"));
        }
        let to = to.into();
        if to.is_empty() {
            return Err(OpenSigError::argument("to argument is missing"));
        }
        let fee = options.fee.unwrap_or(self.minimum_fee);
        if let Payment::Amount(amount) = payment {
            if amount == 0 {
                return Err(OpenSigError::argument("invalid payment amount '0'"));
            }
            if amount.checked_add(fee).is_none() {
                return Err(OpenSigError::argument("payment plus fee is too large"));
            }
        }

        let mut draft = ReceiptDraft::default();

        debug!(stage = %Stage::ResolvingSource);
        let source = resolve_identity(from)
            .await
            .map_err(|e| failed(Stage::ResolvingSource, e))?;
        draft.set_from(source.public_key(), source.label());

        debug!(stage = %Stage::ResolvingDestination);
        let destination = resolve_public_address(to)
            .await
            .map_err(|e| failed(Stage::ResolvingDestination, e))?;
        draft.set_to(&destination.address, destination.label.as_deref());

        debug!(stage = %Stage::FetchingOutputs, address = source.public_key());
        let outputs = self
            .gateway
            .query_unspent_outputs(source.public_key())
            .await
            .map_err(|e| failed(Stage::FetchingOutputs, e.into()))?;

        debug!(stage = %Stage::SelectingInputs, available = outputs.len());
        let selection = select(&outputs, payment, fee)
            .map_err(|e| failed(Stage::SelectingInputs, e))?
            .ok_or_else(|| failed(Stage::SelectingInputs, OpenSigError::InsufficientFunds))?;
        let payment = match payment {
            Payment::Amount(amount) => amount,
            Payment::All => selection.total_value() - fee,
        };

        debug!(stage = %Stage::BuildingTransaction, inputs = selection.chosen_outputs().len());
        let builder = self
            .build_transaction(&selection, &source, &destination.address, payment, fee)
            .map_err(|e| failed(Stage::BuildingTransaction, e))?;
        draft.set_amounts(selection.total_value(), payment, fee, selection.change());

        debug!(stage = %Stage::SigningInputs);
        let builder = sign_inputs(builder, &source, selection.chosen_outputs().len())
            .map_err(|e| failed(Stage::SigningInputs, e))?;

        let built = builder.build().map_err(|e| {
            failed(
                Stage::Built,
                OpenSigError::internal(format!("could not build transaction due to: {e}")),
            )
        })?;
        debug!(stage = %Stage::Built, txid = %built.id);

        let response = if options.publish {
            debug!(stage = %Stage::Publishing);
            let text = self
                .gateway
                .publish(&built.hex)
                .await
                .map_err(|e| failed(Stage::Publishing, e.into()))?;
            PublishResponse::Published(text)
        } else {
            PublishResponse::NotPublished
        };

        let receipt = draft.finish(built, response)?;
        info!(
            txid = %receipt.transaction_id,
            from = %receipt.from.address,
            to = %receipt.to.address,
            payment = receipt.payment,
            fee = receipt.fee,
            published = receipt.response.is_published(),
            "transaction built"
        );
        Ok(receipt)
    }

    fn build_transaction(
        &self,
        selection: &InputSelection,
        source: &Identity,
        destination: &str,
        payment: u64,
        fee: u64,
    ) -> Result<TransactionBuilder> {
        let balanced = payment
            .checked_add(fee)
            .and_then(|v| v.checked_add(selection.change()))
            == Some(selection.total_value());
        if !balanced {
            return Err(OpenSigError::Internal {
                message: "failed to create a valid transaction inputs".to_string(),
                details: Some(json!({
                    "value": selection.total_value(),
                    "change": selection.change(),
                    "payment": payment,
                    "fee": fee,
                })),
            });
        }

        let mut builder = self.gateway.new_transaction_builder();
        for (index, output) in selection.chosen_outputs().iter().enumerate() {
            builder
                .add_input(&output.id, output.sequence_index, index as u32)
                .map_err(|e| invalid_output(e.to_string(), output))?;
        }

        builder
            .add_output(destination, payment)
            .map_err(|e| OpenSigError::internal(format!("could not build transaction due to: {e}")))?;
        if selection.change() > 0 {
            builder
                .add_output(source.public_key(), selection.change())
                .map_err(|e| OpenSigError::internal(format!("could not build transaction due to: {e}")))?;
        }
        Ok(builder)
    }

    /// Balance held by `key` in satoshis.
    ///
    /// `key` may be an address form; no key derivation happens in that case.
    #[instrument(skip_all)]
    pub async fn balance(&self, key: impl Into<Token>) -> Result<u64> {
        let key = key.into();
        if key.is_empty() {
            return Err(OpenSigError::argument("key argument is missing"));
        }
        let address = resolve_public_address(key)
            .await
            .map_err(|e| failed(Stage::ResolvingSource, e))?;
        let balance = self
            .gateway
            .query_balance(&address.address)
            .await
            .map_err(|e| failed(Stage::FetchingOutputs, e.into()))?;
        debug!(address = %address.address, balance, "balance");
        Ok(balance)
    }

    /// Resolve any identity token.
    pub async fn get_key(&self, token: impl Into<Token>) -> Result<Identity> {
        let token = token.into();
        if token.is_empty() {
            return Err(OpenSigError::argument("key argument is missing"));
        }
        resolve_identity(token).await
    }

    /// A new random identity.
    pub fn create(&self, label: Option<&str>) -> Identity {
        Identity::random(label)
    }

    /// Publish a raw transaction; returns the ledger's response text.
    #[instrument(skip_all)]
    pub async fn publish(&self, transaction_hex: &str) -> Result<String> {
        if transaction_hex.trim().is_empty() {
            return Err(OpenSigError::argument("transaction argument is missing"));
        }
        self.gateway
            .publish(transaction_hex.trim())
            .await
            .map_err(|e| failed(Stage::Publishing, e.into()))
    }
}

fn invalid_output(message: String, output: &UnspentOutput) -> OpenSigError {
    OpenSigError::blockchain(
        "could not build transaction due to invalid unspent output id or sequence",
        json!({
            "message": message,
            "transaction": {
                "id": output.id,
                "sequence": output.sequence_index,
                "value": output.value,
            },
        }),
    )
}

fn sign_inputs(
    mut builder: TransactionBuilder,
    source: &Identity,
    inputs: usize,
) -> Result<TransactionBuilder> {
    for index in 0..inputs {
        builder
            .sign(index, source.signing_key())
            .map_err(|e| OpenSigError::internal(format!("could not sign transaction due to: {e}")))?;
    }
    Ok(builder)
}
