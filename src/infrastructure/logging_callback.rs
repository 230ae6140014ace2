use crate::domain::callback::CallbackPayload;
use crate::domain::ports::CallbackDelivery;
use crate::error::Result;
use async_trait::async_trait;
use tracing::info;

/// Writes each payload to the log instead of posting it.
///
/// Used when no HTTP client is compiled in.
#[derive(Default, Clone)]
pub struct LoggingCallbackDelivery;

#[async_trait]
impl CallbackDelivery for LoggingCallbackDelivery {
    async fn deliver(&self, url: &str, payload: &CallbackPayload) -> Result<()> {
        let body = serde_json::to_string(payload)?;
        info!(
            callback_url = %url,
            batch_id = %payload.invoices_batch_id,
            scheme_id = %payload.scheme_id,
            %body,
            "callback payload"
        );
        Ok(())
    }
}
