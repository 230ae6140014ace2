use serde::{Deserialize, Serialize};

/// Identity of the caller a request runs on behalf of.
///
/// Captured when a request arrives and handed explicitly to every operation,
/// including those that run on a background task.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct SecurityContext {
    pub principal: String,
}

impl SecurityContext {
    pub fn new(principal: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
        }
    }
}
