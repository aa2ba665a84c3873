//! Error types for the extension hooks.

use thiserror::Error;
use wordmark_content::ContentError;
use wordmark_storage::StorageError;

/// Result type for extension operations.
pub type ExtensionResult<T> = Result<T, ExtensionError>;

/// Errors surfaced to the host. None of them leave the page half-edited:
/// storage failures happen before the document is touched.
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// Persistence failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A document edit failed.
    #[error("content error: {0}")]
    Content(#[from] ContentError),

    /// Configuration could not be read.
    #[error("config error: {0}")]
    Config(String),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
