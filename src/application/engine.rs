use super::coordinator::{AsyncExecutionCoordinator, Submission};
use super::dispatcher::SchemeFanoutDispatcher;
use super::filter::FilterPipeline;
use super::operations::{
    ComputationStrategies, GenerateInvoices, SchemeOperationHandle, TransitionPayments,
};
use super::selection::WorkingSetSelector;
use super::transition::StateTransitionEngine;
use crate::domain::criteria::RequestCriteria;
use crate::domain::identity::SecurityContext;
use crate::domain::payment::{PaymentStatus, StatusUpdate, TransitionTable};
use crate::domain::ports::{
    CallbackDeliveryHandle, ParticipantRosterHandle, PaymentRecordStoreHandle,
    PaymentViewSourceHandle, SchemeRegistryHandle,
};
use crate::domain::result::{TransactionResult, TransitionSummary};
use crate::error::Result;
use std::sync::Arc;

/// Adapters the engine is wired to.
pub struct EnginePorts {
    pub schemes: SchemeRegistryHandle,
    pub roster: ParticipantRosterHandle,
    pub views: PaymentViewSourceHandle,
    pub records: PaymentRecordStoreHandle,
    pub delivery: CallbackDeliveryHandle,
}

pub struct EngineOptions {
    pub known_payment_types: Vec<String>,
    pub transitions: TransitionTable,
    pub max_background_tasks: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            known_payment_types: Vec::new(),
            transitions: TransitionTable::default(),
            max_background_tasks: 4,
        }
    }
}

/// What a request asks the engine to do for each scheme.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Operation {
    Compute,
    Invoice,
    Transition(PaymentStatus),
}

/// Result of [`PaymentEngine::handle`].
pub enum Outcome {
    Completed(Vec<TransactionResult>),
    Submitted(Submission),
}

/// The main entry point for payment computation, invoicing and status changes.
///
/// `PaymentEngine` resolves the schemes a request addresses and runs the
/// requested operation over each of them, either inline or on a background
/// task that reports back through the request's callback URL.
pub struct PaymentEngine {
    dispatcher: Arc<SchemeFanoutDispatcher>,
    coordinator: AsyncExecutionCoordinator,
    selector: Arc<WorkingSetSelector>,
    transitions: Arc<StateTransitionEngine>,
    strategies: ComputationStrategies,
}

impl PaymentEngine {
    pub fn new(ports: EnginePorts, options: EngineOptions) -> Self {
        let dispatcher = Arc::new(SchemeFanoutDispatcher::new(ports.schemes));
        let selector = Arc::new(WorkingSetSelector::new(
            ports.roster,
            ports.views,
            FilterPipeline::standard(),
            options.known_payment_types,
        ));
        let transitions = Arc::new(StateTransitionEngine::new(
            ports.records,
            options.transitions,
        ));
        Self {
            coordinator: AsyncExecutionCoordinator::new(
                dispatcher.clone(),
                ports.delivery,
                options.max_background_tasks,
            ),
            strategies: ComputationStrategies::new(selector.clone()),
            dispatcher,
            selector,
            transitions,
        }
    }

    /// Picks the per-scheme operation once, from the request shape.
    pub fn operation_for(
        &self,
        operation: Operation,
        criteria: &RequestCriteria,
    ) -> SchemeOperationHandle {
        match operation {
            Operation::Compute => self.strategies.select(criteria),
            Operation::Invoice => Arc::new(GenerateInvoices::new(
                self.selector.clone(),
                self.transitions.clone(),
            )),
            Operation::Transition(target) => Arc::new(TransitionPayments::new(
                self.selector.clone(),
                self.transitions.clone(),
                target,
            )),
        }
    }

    /// Runs `operation` inline and returns one result per scheme.
    pub async fn execute(
        &self,
        operation: Operation,
        criteria: &RequestCriteria,
        ctx: &SecurityContext,
    ) -> Result<Vec<TransactionResult>> {
        let op = self.operation_for(operation, criteria);
        self.dispatcher.dispatch(criteria, op.as_ref(), ctx).await
    }

    /// Runs `operation` in the background; results go to the callback URL.
    pub async fn submit(
        &self,
        operation: Operation,
        criteria: RequestCriteria,
        ctx: SecurityContext,
    ) -> Result<Submission> {
        let op = self.operation_for(operation, &criteria);
        self.coordinator.submit(criteria, op, ctx).await
    }

    /// Runs in the background when the request names a callback URL,
    /// inline otherwise.
    pub async fn handle(
        &self,
        operation: Operation,
        criteria: RequestCriteria,
        ctx: SecurityContext,
    ) -> Result<Outcome> {
        if criteria.callback_url.is_some() {
            Ok(Outcome::Submitted(self.submit(operation, criteria, ctx).await?))
        } else {
            Ok(Outcome::Completed(self.execute(operation, &criteria, &ctx).await?))
        }
    }

    /// Applies explicit `(record, status)` updates outside any scheme fan-out.
    pub async fn update_statuses(
        &self,
        updates: &[StatusUpdate],
        ctx: &SecurityContext,
    ) -> TransitionSummary {
        self.transitions.transition(updates, ctx).await
    }
}
