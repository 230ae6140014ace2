use crate::domain::identity::SecurityContext;
use crate::domain::payment::{StatusUpdate, TransitionTable};
use crate::domain::ports::PaymentRecordStoreHandle;
use crate::domain::result::TransitionSummary;
use tracing::{debug, warn};

/// Applies requested status changes record by record.
///
/// Each record is looked up and written on its own, so one bad record never
/// stops the rest of the request. Nothing is retried.
pub struct StateTransitionEngine {
    store: PaymentRecordStoreHandle,
    table: TransitionTable,
}

impl StateTransitionEngine {
    pub fn new(store: PaymentRecordStoreHandle, table: TransitionTable) -> Self {
        Self { store, table }
    }

    pub async fn transition(
        &self,
        updates: &[StatusUpdate],
        ctx: &SecurityContext,
    ) -> TransitionSummary {
        let mut summary = TransitionSummary::default();
        self.apply(updates, ctx, &mut summary).await;
        summary
    }

    /// Same as [`transition`](Self::transition), accumulating into an
    /// existing summary.
    pub async fn apply(
        &self,
        updates: &[StatusUpdate],
        ctx: &SecurityContext,
        summary: &mut TransitionSummary,
    ) {
        for update in updates {
            match self.apply_one(update, ctx).await {
                Ok(()) => summary.record_success(&update.record_id),
                Err(reason) => {
                    warn!(
                        record_id = %update.record_id,
                        principal = %ctx.principal,
                        %reason,
                        "status transition rejected"
                    );
                    summary.record_failure(&update.record_id, reason);
                }
            }
        }
    }

    async fn apply_one(
        &self,
        update: &StatusUpdate,
        ctx: &SecurityContext,
    ) -> std::result::Result<(), String> {
        let record = self
            .store
            .get(&update.record_id)
            .await
            .map_err(|e| e.to_string())?
            .ok_or_else(|| "record not found".to_string())?;

        if !self.table.allows(record.status, update.status) {
            return Err(format!(
                "illegal transition {} -> {}",
                record.status, update.status
            ));
        }

        self.store
            .update_status(&update.record_id, update.status, &ctx.principal)
            .await
            .map_err(|e| e.to_string())?;
        debug!(
            record_id = %update.record_id,
            from = %record.status,
            to = %update.status,
            "status transitioned"
        );
        Ok(())
    }
}
