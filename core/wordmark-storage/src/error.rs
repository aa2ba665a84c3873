//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from the SQLite tier.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Neither tier answered a read.
    #[error("storage tier unavailable: {0}")]
    TierUnavailable(String),

    /// A stored record could not be turned into a domain value.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The backend's internal lock was poisoned by a panicking writer.
    #[error("storage backend poisoned: {0}")]
    Poisoned(String),
}
