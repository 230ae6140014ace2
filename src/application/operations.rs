//! Per-scheme operations the dispatcher fans out: payment computation,
//! invoice generation and status transitions by criteria.

use super::selection::WorkingSetSelector;
use super::transition::StateTransitionEngine;
use crate::domain::criteria::RequestCriteria;
use crate::domain::identity::SecurityContext;
use crate::domain::payment::{PaymentStatus, PaymentView, StatusUpdate};
use crate::domain::result::{
    ComputationSummary, InvoiceBatch, InvoiceLine, OperationKind, TransactionResult,
    TransitionSummary,
};
use crate::domain::scheme::Scheme;
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// One unit of work run against a single scheme.
///
/// Business failures should come back inside the result; an `Err` is
/// recorded by the dispatcher against the scheme and the fan-out moves on.
#[async_trait]
pub trait SchemeOperation: Send + Sync {
    fn kind(&self) -> OperationKind;

    async fn execute(
        &self,
        criteria: &RequestCriteria,
        scheme: &Scheme,
        ctx: &SecurityContext,
    ) -> Result<TransactionResult>;
}

pub type SchemeOperationHandle = Arc<dyn SchemeOperation>;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ComputationMode {
    Standard,
    /// Only payments raised against the request's auction lot.
    Auction,
}

pub struct ComputePayments {
    selector: Arc<WorkingSetSelector>,
    mode: ComputationMode,
}

impl ComputePayments {
    pub fn new(selector: Arc<WorkingSetSelector>, mode: ComputationMode) -> Self {
        Self { selector, mode }
    }
}

#[async_trait]
impl SchemeOperation for ComputePayments {
    fn kind(&self) -> OperationKind {
        OperationKind::Compute
    }

    async fn execute(
        &self,
        criteria: &RequestCriteria,
        scheme: &Scheme,
        _ctx: &SecurityContext,
    ) -> Result<TransactionResult> {
        let set = self.selector.select(criteria, scheme).await?;
        let views: Vec<&PaymentView> = match (self.mode, &criteria.auction) {
            (ComputationMode::Auction, Some(auction)) => set
                .views
                .iter()
                .filter(|v| v.auction_lot.as_deref() == Some(auction.lot_id.as_str()))
                .collect(),
            _ => set.views.iter().collect(),
        };

        let mut summary = ComputationSummary::empty(&scheme.id);
        summary.participants = set
            .participants
            .iter()
            .filter(|p| p.participant_type == criteria.participant_type)
            .count();
        summary.payments = views.len();
        for view in views {
            summary.total += view.amount;
            *summary
                .totals_by_payment_type
                .entry(view.payment_type.clone())
                .or_insert(Decimal::ZERO) += view.amount;
        }
        Ok(TransactionResult::Computation(summary))
    }
}

/// Computation strategies keyed by request shape.
pub struct ComputationStrategies {
    standard: SchemeOperationHandle,
    auction: SchemeOperationHandle,
}

impl ComputationStrategies {
    pub fn new(selector: Arc<WorkingSetSelector>) -> Self {
        Self {
            standard: Arc::new(ComputePayments::new(
                selector.clone(),
                ComputationMode::Standard,
            )),
            auction: Arc::new(ComputePayments::new(selector, ComputationMode::Auction)),
        }
    }

    /// Requests that reference an auction lot use the auction strategy.
    pub fn select(&self, criteria: &RequestCriteria) -> SchemeOperationHandle {
        if criteria.auction.is_some() {
            self.auction.clone()
        } else {
            self.standard.clone()
        }
    }
}

/// Marks the selected records as invoiced and groups the ones that moved
/// into invoice lines per participant and payment type.
pub struct GenerateInvoices {
    selector: Arc<WorkingSetSelector>,
    transitions: Arc<StateTransitionEngine>,
}

impl GenerateInvoices {
    pub fn new(selector: Arc<WorkingSetSelector>, transitions: Arc<StateTransitionEngine>) -> Self {
        Self {
            selector,
            transitions,
        }
    }
}

#[async_trait]
impl SchemeOperation for GenerateInvoices {
    fn kind(&self) -> OperationKind {
        OperationKind::Invoice
    }

    async fn execute(
        &self,
        criteria: &RequestCriteria,
        scheme: &Scheme,
        ctx: &SecurityContext,
    ) -> Result<TransactionResult> {
        let set = self.selector.select(criteria, scheme).await?;
        let updates: Vec<StatusUpdate> = set
            .views
            .iter()
            .map(|v| StatusUpdate::new(v.record_id.clone(), PaymentStatus::Invoiced))
            .collect();
        let summary = self.transitions.transition(&updates, ctx).await;

        let by_record: HashMap<&str, &PaymentView> = set
            .views
            .iter()
            .map(|v| (v.record_id.as_str(), v))
            .collect();
        let mut lines: BTreeMap<(String, String), InvoiceLine> = BTreeMap::new();
        for record_id in &summary.transitioned {
            let Some(view) = by_record.get(record_id.as_str()) else {
                continue;
            };
            let line = lines
                .entry((view.participant_id.clone(), view.payment_type.clone()))
                .or_insert_with(|| InvoiceLine {
                    participant_id: view.participant_id.clone(),
                    payment_type: view.payment_type.clone(),
                    amount: Decimal::ZERO,
                    record_ids: Vec::new(),
                });
            line.amount += view.amount;
            line.record_ids.push(record_id.clone());
        }

        let mut batch = InvoiceBatch::empty(&scheme.id);
        batch.invoices = lines.into_values().collect();
        batch.errors = summary.errors.iter().map(ToString::to_string).collect();
        Ok(TransactionResult::Invoice(batch))
    }
}

/// Moves every selected record to one target status.
pub struct TransitionPayments {
    selector: Arc<WorkingSetSelector>,
    transitions: Arc<StateTransitionEngine>,
    target: PaymentStatus,
}

impl TransitionPayments {
    pub fn new(
        selector: Arc<WorkingSetSelector>,
        transitions: Arc<StateTransitionEngine>,
        target: PaymentStatus,
    ) -> Self {
        Self {
            selector,
            transitions,
            target,
        }
    }
}

#[async_trait]
impl SchemeOperation for TransitionPayments {
    fn kind(&self) -> OperationKind {
        OperationKind::Transition
    }

    async fn execute(
        &self,
        criteria: &RequestCriteria,
        scheme: &Scheme,
        ctx: &SecurityContext,
    ) -> Result<TransactionResult> {
        let set = self.selector.select(criteria, scheme).await?;
        let updates: Vec<StatusUpdate> = set
            .views
            .iter()
            .map(|v| StatusUpdate::new(v.record_id.clone(), self.target))
            .collect();

        let mut summary = TransitionSummary::for_scheme(&scheme.id);
        self.transitions.apply(&updates, ctx, &mut summary).await;
        Ok(TransactionResult::Transition(summary))
    }
}
