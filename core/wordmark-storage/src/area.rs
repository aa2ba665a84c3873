//! Storage tier abstraction.
//!
//! Defines the interface shared by the primary and fallback tiers.

use crate::error::StorageResult;
use async_trait::async_trait;
use std::fmt;

/// A set of stored values keyed by storage key.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Which of the two tiers a gateway is using.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Primary,
    Fallback,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Primary => write!(f, "primary"),
            Tier::Fallback => write!(f, "fallback"),
        }
    }
}

/// One key/value tier.
#[async_trait]
pub trait StorageArea: Send + Sync {
    /// Returns a short name for logging.
    fn name(&self) -> &'static str;

    /// Reads the given keys.
    ///
    /// Keys that are not stored are absent from the returned record.
    /// `Ok(None)` means the tier itself is unavailable; callers decide
    /// whether to fall back.
    async fn get(&self, keys: &[&str]) -> StorageResult<Option<Record>>;

    /// Writes every key in `items` as one atomic update.
    async fn set(&self, items: Record) -> StorageResult<()>;
}

/// A tier that never answers. Stands in for a primary backend that failed
/// to open, so the gateway falls back on its first read.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineArea;

#[async_trait]
impl StorageArea for OfflineArea {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn get(&self, _keys: &[&str]) -> StorageResult<Option<Record>> {
        Ok(None)
    }

    async fn set(&self, _items: Record) -> StorageResult<()> {
        Err(crate::StorageError::TierUnavailable(self.name().into()))
    }
}
