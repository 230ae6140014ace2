use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Scheme not found: {0}")]
    SchemeNotFound(String),
    #[error("No scheme registered for auction lot {0}")]
    AuctionLotNotFound(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Operation failed: {0}")]
    OperationError(String),
    #[error("Callback delivery failed: {0}")]
    DeliveryError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, PaymentError>;
