use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Failure kinds surfaced by the ledger core.
///
/// Business failures are terminal, synchronous results of a single call: the
/// core never retries internally, and no partial mutation survives any error
/// path.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("account not found: {0}")]
    AccountNotFound(String),
    #[error("insufficient funds on account {0}")]
    InsufficientFunds(String),
    #[error("invalid transfer: {0}")]
    InvalidTransfer(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("payment request not found: {0}")]
    RequestNotFound(u64),
    #[error("invalid spend: {0}")]
    InvalidSpend(String),
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(Box::new(err))
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for LedgerError {
    fn from(err: rocksdb::Error) -> Self {
        Self::Storage(Box::new(err))
    }
}
