//! Application layer containing the request resolution and dispatch logic.
//!
//! [`engine::PaymentEngine`] is the entry point. It resolves the schemes a
//! request addresses, narrows each scheme's payments through the participant
//! partitioner and the filter pipeline, and runs the requested operation per
//! scheme, inline or on a background task.

pub mod coordinator;
pub mod dispatcher;
pub mod engine;
pub mod filter;
pub mod operations;
pub mod partition;
pub mod selection;
pub mod transition;
