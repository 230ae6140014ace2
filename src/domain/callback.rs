use super::criteria::RequestCriteria;
use super::result::TransactionResult;
use serde::{Deserialize, Serialize};

/// What an asynchronous caller receives for each scheme processed.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CallbackPayload {
    pub invoices_batch_id: String,
    pub errors: Vec<String>,
    pub compute_parameters: RequestCriteria,
    pub scheme_id: String,
}

impl CallbackPayload {
    /// Invoice results report their own batch id; any other result is
    /// reported under the batch id of the submission.
    pub fn from_result(
        submission_batch_id: &str,
        criteria: &RequestCriteria,
        result: &TransactionResult,
    ) -> Self {
        let invoices_batch_id = match result {
            TransactionResult::Invoice(batch) => batch.invoices_batch_id.to_string(),
            _ => submission_batch_id.to_string(),
        };
        Self {
            invoices_batch_id,
            errors: result.errors(),
            compute_parameters: criteria.clone(),
            scheme_id: result.scheme_id().unwrap_or_default().to_string(),
        }
    }
}
