//! Core type definitions for Wordmark.
//!
//! This crate defines the data entities shared by storage, content scanning
//! and the extension hooks:
//! - Dictionary entry identifiers and millisecond timestamps
//! - [`DictionaryEntry`], the stored term with its matching mode
//! - [`Settings`], the user preferences record
//! - [`HighlightingLog`], the bounded history of highlighted terms per page
//!
//! None of these types know how they are persisted. The field-keyed storage
//! records live in `wordmark-storage`.

mod entry;
mod highlighting_log;
mod ids;
mod settings;
mod timestamp;

pub use entry::DictionaryEntry;
pub use highlighting_log::{HighlightingLog, HighlightingLogItem};
pub use ids::EntryId;
pub use settings::{Settings, DEFAULT_TIMEOUT_SECS};
pub use timestamp::Timestamp;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid entry id: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
