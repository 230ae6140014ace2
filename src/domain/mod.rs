//! Domain types and the ports the engine talks to.
//!
//! Nothing in here performs I/O; adapters under `infrastructure` implement
//! the traits in [`ports`].

pub mod callback;
pub mod criteria;
pub mod identity;
pub mod participant;
pub mod payment;
pub mod ports;
pub mod result;
pub mod scheme;
