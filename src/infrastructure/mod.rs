//! Adapters implementing the domain ports.

#[cfg(feature = "callback-http")]
pub mod http_callback;
pub mod in_memory;
pub mod logging_callback;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
