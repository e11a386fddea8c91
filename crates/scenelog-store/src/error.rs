//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur against the persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored scene could not be decoded: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("stored timestamp out of range: {0}")]
    CorruptTimestamp(i64),

    #[error("invalid collection name: {0:?}")]
    InvalidCollection(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
