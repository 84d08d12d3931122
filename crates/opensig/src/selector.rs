//! Coin selection.
//!
//! Prefers the smallest single output that covers the target; when none is
//! big enough, accumulates outputs largest first until the target is met.

use std::str::FromStr;

use opensig_ledger::UnspentOutput;
use serde_json::json;

use crate::error::{OpenSigError, Result};

/// Amount to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payment {
    /// A fixed number of satoshis.
    Amount(u64),
    /// Everything at the source address, less the fee.
    All,
}

impl FromStr for Payment {
    type Err = OpenSigError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Payment::All);
        }
        match trimmed.parse::<u64>() {
            Ok(amount) if amount > 0 => Ok(Payment::Amount(amount)),
            _ => Err(OpenSigError::argument(format!("invalid payment amount '{s}'"))),
        }
    }
}

impl From<u64> for Payment {
    fn from(amount: u64) -> Self {
        Payment::Amount(amount)
    }
}

impl std::fmt::Display for Payment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payment::Amount(amount) => write!(f, "{amount}"),
            Payment::All => f.write_str("all"),
        }
    }
}

/// What the selection had to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Payment plus fee.
    Value(u64),
    /// Every output.
    All,
}

/// A set of outputs chosen to fund a transaction.
///
/// Always satisfies `total_value - change == target`, with `change == 0`
/// for [`Target::All`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSelection {
    chosen: Vec<UnspentOutput>,
    target: Target,
    change: u64,
    total_value: u64,
}

impl InputSelection {
    /// Validate and build a selection.
    ///
    /// # Returns
    /// An `InternalError` if the outputs do not add up to target plus change.
    pub fn new(chosen: Vec<UnspentOutput>, target: Target, change: u64) -> Result<Self> {
        let total_value = chosen
            .iter()
            .try_fold(0u64, |sum, o| sum.checked_add(o.value));
        let consistent = match (total_value, target) {
            (Some(total), Target::All) => change == 0 && !chosen.is_empty() && total > 0,
            (Some(total), Target::Value(t)) => total.checked_sub(change) == Some(t),
            (None, _) => false,
        };
        match (consistent, total_value) {
            (true, Some(total_value)) => Ok(InputSelection {
                chosen,
                target,
                change,
                total_value,
            }),
            _ => Err(OpenSigError::Internal {
                message: "failed to create a valid transaction inputs".to_string(),
                details: Some(json!({
                    "outputs": chosen.iter().map(|o| json!({ "id": o.id, "sequence": o.sequence_index, "value": o.value })).collect::<Vec<_>>(),
                    "target": match target { Target::Value(t) => json!(t), Target::All => json!("all") },
                    "change": change,
                })),
            }),
        }
    }

    /// The chosen outputs, in spending order.
    pub fn chosen_outputs(&self) -> &[UnspentOutput] {
        &self.chosen
    }

    /// The target covered.
    pub fn target(&self) -> Target {
        self.target
    }

    /// Value returned to the source.
    pub fn change(&self) -> u64 {
        self.change
    }

    /// Sum of the chosen outputs.
    pub fn total_value(&self) -> u64 {
        self.total_value
    }
}

/// Choose outputs paying `payment` plus `fee`.
///
/// # Returns
/// `Ok(None)` when the outputs cannot cover the target. For
/// [`Payment::All`] every output is taken in the order given, and the total
/// must exceed the fee.
pub fn select(outputs: &[UnspentOutput], payment: Payment, fee: u64) -> Result<Option<InputSelection>> {
    if outputs.is_empty() {
        return Ok(None);
    }

    let target = match payment {
        Payment::All => {
            let total = outputs
                .iter()
                .try_fold(0u64, |sum, o| sum.checked_add(o.value))
                .ok_or_else(|| OpenSigError::internal("unspent output total overflows"))?;
            if total <= fee {
                return Ok(None);
            }
            return InputSelection::new(outputs.to_vec(), Target::All, 0).map(Some);
        }
        Payment::Amount(amount) => amount
            .checked_add(fee)
            .ok_or_else(|| OpenSigError::argument("payment plus fee is too large"))?,
    };

    let mut ascending = outputs.to_vec();
    ascending.sort_by_key(|o| o.value);
    if let Some(single) = ascending.iter().find(|o| o.value >= target) {
        let change = single.value - target;
        return InputSelection::new(vec![single.clone()], Target::Value(target), change).map(Some);
    }

    let mut descending = ascending;
    descending.reverse();
    let mut chosen = Vec::new();
    let mut sum = 0u64;
    for output in descending {
        sum = sum.saturating_add(output.value);
        chosen.push(output);
        if sum >= target {
            return InputSelection::new(chosen, Target::Value(target), sum - target).map(Some);
        }
    }
    Ok(None)
}
