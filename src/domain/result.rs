use super::scheme::Scheme;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Which kind of per-scheme operation produced a result.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    Compute,
    Invoice,
    Transition,
}

#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ComputationSummary {
    pub scheme_id: String,
    /// Participants of the requested type left in scope after partitioning.
    pub participants: usize,
    pub payments: usize,
    pub total: Decimal,
    pub totals_by_payment_type: BTreeMap<String, Decimal>,
    pub errors: Vec<String>,
}

impl ComputationSummary {
    pub fn empty(scheme_id: impl Into<String>) -> Self {
        Self {
            scheme_id: scheme_id.into(),
            participants: 0,
            payments: 0,
            total: Decimal::ZERO,
            totals_by_payment_type: BTreeMap::new(),
            errors: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub participant_id: String,
    pub payment_type: String,
    pub amount: Decimal,
    pub record_ids: Vec<String>,
}

#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceBatch {
    pub invoices_batch_id: Uuid,
    pub scheme_id: String,
    pub invoices: Vec<InvoiceLine>,
    pub errors: Vec<String>,
}

impl InvoiceBatch {
    pub fn empty(scheme_id: impl Into<String>) -> Self {
        Self {
            invoices_batch_id: Uuid::new_v4(),
            scheme_id: scheme_id.into(),
            invoices: Vec::new(),
            errors: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecordError {
    pub record_id: String,
    pub reason: String,
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.record_id, self.reason)
    }
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransitionSummary {
    /// Set when the transition ran as part of a scheme fan-out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme_id: Option<String>,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Records that moved, in request order.
    pub transitioned: Vec<String>,
    pub errors: Vec<RecordError>,
    /// Failures that are not tied to a single record.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scheme_errors: Vec<String>,
}

impl TransitionSummary {
    pub fn for_scheme(scheme_id: impl Into<String>) -> Self {
        Self {
            scheme_id: Some(scheme_id.into()),
            ..Self::default()
        }
    }

    pub fn record_success(&mut self, record_id: &str) {
        self.attempted += 1;
        self.succeeded += 1;
        self.transitioned.push(record_id.to_string());
    }

    pub fn record_failure(&mut self, record_id: &str, reason: impl Into<String>) {
        self.attempted += 1;
        self.failed += 1;
        self.errors.push(RecordError {
            record_id: record_id.to_string(),
            reason: reason.into(),
        });
    }
}

/// Outcome of one per-scheme operation.
///
/// Errors are carried as data; a failed scheme still yields a result of the
/// kind its operation would have produced.
#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionResult {
    Computation(ComputationSummary),
    Invoice(InvoiceBatch),
    Transition(TransitionSummary),
}

impl TransactionResult {
    /// Builds the result for a scheme whose operation failed outright.
    pub fn failed(kind: OperationKind, scheme: &Scheme, error: impl Into<String>) -> Self {
        let error = error.into();
        match kind {
            OperationKind::Compute => {
                let mut summary = ComputationSummary::empty(&scheme.id);
                summary.errors.push(error);
                TransactionResult::Computation(summary)
            }
            OperationKind::Invoice => {
                let mut batch = InvoiceBatch::empty(&scheme.id);
                batch.errors.push(error);
                TransactionResult::Invoice(batch)
            }
            OperationKind::Transition => {
                let mut summary = TransitionSummary::for_scheme(&scheme.id);
                summary.scheme_errors.push(error);
                TransactionResult::Transition(summary)
            }
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            TransactionResult::Computation(_) => OperationKind::Compute,
            TransactionResult::Invoice(_) => OperationKind::Invoice,
            TransactionResult::Transition(_) => OperationKind::Transition,
        }
    }

    pub fn scheme_id(&self) -> Option<&str> {
        match self {
            TransactionResult::Computation(s) => Some(&s.scheme_id),
            TransactionResult::Invoice(b) => Some(&b.scheme_id),
            TransactionResult::Transition(t) => t.scheme_id.as_deref(),
        }
    }

    /// Every error carried by this result, rendered as text.
    pub fn errors(&self) -> Vec<String> {
        match self {
            TransactionResult::Computation(s) => s.errors.clone(),
            TransactionResult::Invoice(b) => b.errors.clone(),
            TransactionResult::Transition(t) => t
                .scheme_errors
                .iter()
                .cloned()
                .chain(t.errors.iter().map(ToString::to_string))
                .collect(),
        }
    }

    pub fn has_errors(&self) -> bool {
        match self {
            TransactionResult::Computation(s) => !s.errors.is_empty(),
            TransactionResult::Invoice(b) => !b.errors.is_empty(),
            TransactionResult::Transition(t) => !t.errors.is_empty() || !t.scheme_errors.is_empty(),
        }
    }
}
