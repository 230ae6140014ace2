use crate::error::PaymentError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Computed,
    Approved,
    Invoiced,
    Paid,
    Cancelled,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Computed => "COMPUTED",
            PaymentStatus::Approved => "APPROVED",
            PaymentStatus::Invoiced => "INVOICED",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Cancelled => "CANCELLED",
        };
        f.write_str(name)
    }
}

impl FromStr for PaymentStatus {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(PaymentStatus::Pending),
            "COMPUTED" => Ok(PaymentStatus::Computed),
            "APPROVED" => Ok(PaymentStatus::Approved),
            "INVOICED" => Ok(PaymentStatus::Invoiced),
            "PAID" => Ok(PaymentStatus::Paid),
            "CANCELLED" => Ok(PaymentStatus::Cancelled),
            other => Err(PaymentError::ValidationError(format!(
                "Unknown payment status: {other}"
            ))),
        }
    }
}

/// Legal status successors, keyed by current status.
///
/// A status missing from the table has no legal successors.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(transparent)]
pub struct TransitionTable(BTreeMap<PaymentStatus, BTreeSet<PaymentStatus>>);

impl TransitionTable {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn allow(mut self, from: PaymentStatus, to: PaymentStatus) -> Self {
        self.0.entry(from).or_default().insert(to);
        self
    }

    pub fn allows(&self, from: PaymentStatus, to: PaymentStatus) -> bool {
        self.0.get(&from).is_some_and(|next| next.contains(&to))
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        use PaymentStatus::*;
        Self::new()
            .allow(Pending, Computed)
            .allow(Pending, Cancelled)
            .allow(Computed, Approved)
            .allow(Computed, Invoiced)
            .allow(Computed, Pending)
            .allow(Computed, Cancelled)
            .allow(Approved, Invoiced)
            .allow(Approved, Cancelled)
            .allow(Invoiced, Paid)
    }
}

/// A payment or transaction record as held by the record store.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub record_id: String,
    pub scheme_id: String,
    pub participant_id: String,
    /// Participant classification as recorded, e.g. `SML_SUPPLIER`.
    pub participant_type: String,
    pub payment_type: String,
    pub amount: Decimal,
    #[serde(default)]
    pub auction_lot: Option<String>,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub updated_by: Option<String>,
}

impl PaymentRecord {
    pub fn view(&self) -> PaymentView {
        PaymentView {
            record_id: self.record_id.clone(),
            participant_id: self.participant_id.clone(),
            participant_type: self.participant_type.clone(),
            payment_type: self.payment_type.clone(),
            amount: self.amount,
            auction_lot: self.auction_lot.clone(),
        }
    }
}

/// Transient projection of a payment record used for filtering.
#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    pub record_id: String,
    pub participant_id: String,
    pub participant_type: String,
    pub payment_type: String,
    pub amount: Decimal,
    pub auction_lot: Option<String>,
}

/// A requested status change for one record.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub record_id: String,
    pub status: PaymentStatus,
}

impl StatusUpdate {
    pub fn new(record_id: impl Into<String>, status: PaymentStatus) -> Self {
        Self {
            record_id: record_id.into(),
            status,
        }
    }
}
