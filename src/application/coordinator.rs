use super::dispatcher::{SchemeFanoutDispatcher, run_schemes};
use super::operations::SchemeOperationHandle;
use crate::domain::callback::CallbackPayload;
use crate::domain::criteria::RequestCriteria;
use crate::domain::identity::SecurityContext;
use crate::domain::ports::CallbackDeliveryHandle;
use crate::error::{PaymentError, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

/// Handle on a dispatch running in the background.
///
/// There is no cancellation; dropping the handle detaches the task.
pub struct Submission {
    pub batch_id: String,
    pub handle: JoinHandle<()>,
}

/// Runs dispatches on background tasks and posts their results to the
/// request's callback URL.
pub struct AsyncExecutionCoordinator {
    dispatcher: Arc<SchemeFanoutDispatcher>,
    delivery: CallbackDeliveryHandle,
    workers: Arc<Semaphore>,
}

impl AsyncExecutionCoordinator {
    pub fn new(
        dispatcher: Arc<SchemeFanoutDispatcher>,
        delivery: CallbackDeliveryHandle,
        max_background_tasks: usize,
    ) -> Self {
        Self {
            dispatcher,
            delivery,
            workers: Arc::new(Semaphore::new(
                max_background_tasks.clamp(1, Semaphore::MAX_PERMITS),
            )),
        }
    }

    /// Resolves the request's schemes, then hands the fan-out to a background
    /// task and returns straight away.
    ///
    /// A request without a callback URL, or whose schemes cannot be resolved,
    /// is rejected here and no task is started. The caller's identity is
    /// moved into the task and used for every scheme.
    pub async fn submit(
        &self,
        criteria: RequestCriteria,
        op: SchemeOperationHandle,
        ctx: SecurityContext,
    ) -> Result<Submission> {
        let callback_url = criteria
            .callback_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                PaymentError::ValidationError("asynchronous request needs a callback URL".into())
            })?;
        let schemes = self.dispatcher.resolve(&criteria).await?;

        let batch_id = Uuid::new_v4().to_string();
        let task_batch_id = batch_id.clone();
        let delivery = self.delivery.clone();
        let workers = self.workers.clone();
        info!(
            batch_id = %batch_id,
            schemes = schemes.len(),
            principal = %ctx.principal,
            "background dispatch submitted"
        );

        let handle = tokio::spawn(async move {
            let _permit = match workers.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    error!(batch_id = %task_batch_id, error = %e, "worker pool closed");
                    return;
                }
            };

            let results = run_schemes(&criteria, &schemes, op.as_ref(), &ctx).await;
            for result in &results {
                let payload = CallbackPayload::from_result(&task_batch_id, &criteria, result);
                if let Err(e) = delivery.deliver(&callback_url, &payload).await {
                    error!(
                        batch_id = %task_batch_id,
                        scheme_id = %payload.scheme_id,
                        callback_url = %callback_url,
                        error = %e,
                        "callback delivery failed"
                    );
                }
            }
            info!(batch_id = %task_batch_id, "background dispatch complete");
        });

        Ok(Submission { batch_id, handle })
    }
}
