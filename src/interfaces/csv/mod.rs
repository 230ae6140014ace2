pub mod payment_reader;
pub mod status_update_reader;
