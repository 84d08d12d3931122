//! The result of a sign or send.

use opensig_transaction::BuiltTransaction;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{OpenSigError, Result};

/// Response text recorded when a transaction was built but not published.
pub const NOT_PUBLISHED: &str = "Not Published";

/// One side of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Base58Check address.
    pub address: String,
    /// Label the party was resolved with, if any.
    pub label: Option<String>,
}

/// What happened at the publish step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PublishResponse {
    /// Published; holds the ledger's acknowledgement text.
    Published(String),
    /// Built only.
    NotPublished,
}

impl PublishResponse {
    /// The response text.
    pub fn as_str(&self) -> &str {
        match self {
            PublishResponse::Published(text) => text,
            PublishResponse::NotPublished => NOT_PUBLISHED,
        }
    }

    /// Whether the transaction was published.
    pub fn is_published(&self) -> bool {
        matches!(self, PublishResponse::Published(_))
    }
}

impl From<String> for PublishResponse {
    fn from(text: String) -> Self {
        if text == NOT_PUBLISHED {
            PublishResponse::NotPublished
        } else {
            PublishResponse::Published(text)
        }
    }
}

impl Serialize for PublishResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl std::fmt::Display for PublishResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a signed transaction and its publication.
///
/// `input == payment + fee + change` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Source address and label.
    pub from: Party,
    /// Destination address and label.
    pub to: Party,
    /// Total value of the spent outputs.
    pub input: u64,
    /// Value sent to the destination.
    pub payment: u64,
    /// Miner's fee.
    pub fee: u64,
    /// Value returned to the source.
    pub change: u64,
    /// Ledger response, or `Not Published`.
    pub response: PublishResponse,
    /// Display-order transaction id.
    pub transaction_id: String,
    /// Raw transaction hex.
    pub transaction_hex: String,
}

/// A receipt being filled in as the pipeline progresses.
#[derive(Debug, Default)]
pub(crate) struct ReceiptDraft {
    from: Option<Party>,
    to: Option<Party>,
    amounts: Option<(u64, u64, u64, u64)>,
}

impl ReceiptDraft {
    pub(crate) fn set_from(&mut self, address: &str, label: Option<&str>) {
        self.from = Some(Party {
            address: address.to_string(),
            label: label.map(str::to_string),
        });
    }

    pub(crate) fn set_to(&mut self, address: &str, label: Option<&str>) {
        self.to = Some(Party {
            address: address.to_string(),
            label: label.map(str::to_string),
        });
    }

    pub(crate) fn set_amounts(&mut self, input: u64, payment: u64, fee: u64, change: u64) {
        self.amounts = Some((input, payment, fee, change));
    }

    /// Seal the draft once the transaction is built and the publish step is done.
    pub(crate) fn finish(self, built: BuiltTransaction, response: PublishResponse) -> Result<Receipt> {
        let (Some(from), Some(to), Some((input, payment, fee, change))) =
            (self.from, self.to, self.amounts)
        else {
            return Err(OpenSigError::internal("receipt finalized before it was complete"));
        };
        let balanced = payment
            .checked_add(fee)
            .and_then(|v| v.checked_add(change))
            == Some(input);
        if !balanced {
            return Err(OpenSigError::internal(format!(
                "receipt does not balance: input {input}, payment {payment}, fee {fee}, change {change}"
            )));
        }
        Ok(Receipt {
            from,
            to,
            input,
            payment,
            fee,
            change,
            response,
            transaction_id: built.id,
            transaction_hex: built.hex,
        })
    }
}
