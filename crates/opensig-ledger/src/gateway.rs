//! The ledger gateway contract consumed by the signing pipeline.

use opensig_transaction::TransactionBuilder;

use crate::error::LedgerFailure;
use crate::types::{SignatureRecord, UnspentOutput};

/// Queries and publishes against a ledger backend.
///
/// Every failure carries the request it happened on so callers can report
/// it with context.
pub trait LedgerGateway: Send + Sync {
    /// Transactions paying into `address`, one record per transaction.
    fn query_transactions(
        &self,
        address: &str,
    ) -> impl std::future::Future<Output = Result<Vec<SignatureRecord>, LedgerFailure>> + Send;

    /// Spendable outputs held by `address`, in the order the ledger lists them.
    fn query_unspent_outputs(
        &self,
        address: &str,
    ) -> impl std::future::Future<Output = Result<Vec<UnspentOutput>, LedgerFailure>> + Send;

    /// Confirmed balance of `address` in satoshis.
    fn query_balance(
        &self,
        address: &str,
    ) -> impl std::future::Future<Output = Result<u64, LedgerFailure>> + Send;

    /// A fresh builder for a transaction this ledger accepts.
    fn new_transaction_builder(&self) -> TransactionBuilder {
        TransactionBuilder::new()
    }

    /// Submit a raw transaction; returns the ledger's acknowledgement text.
    fn publish(
        &self,
        transaction_hex: &str,
    ) -> impl std::future::Future<Output = Result<String, LedgerFailure>> + Send;
}
