use crate::domain::callback::CallbackPayload;
use crate::domain::ports::CallbackDelivery;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Posts callback payloads as JSON to the caller's URL.
///
/// One attempt per payload; a non-success status counts as a failure.
#[derive(Clone)]
pub struct HttpCallbackDelivery {
    client: Client,
}

impl HttpCallbackDelivery {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PaymentError::InternalError(Box::new(e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CallbackDelivery for HttpCallbackDelivery {
    async fn deliver(&self, url: &str, payload: &CallbackPayload) -> Result<()> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| PaymentError::DeliveryError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PaymentError::DeliveryError(format!(
                "{url} answered {status}"
            )));
        }
        debug!(callback_url = %url, %status, "callback delivered");
        Ok(())
    }
}
