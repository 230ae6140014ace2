//! Payment computation, invoicing and status transitions for participants of
//! a multi-jurisdiction deposit return scheme.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
pub mod logging;
