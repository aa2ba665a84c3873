//! In-process tier.

use crate::area::{Record, StorageArea};
use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Key/value tier held in memory.
///
/// Availability can be switched off to simulate a tier that stops
/// answering. Every successful `set` is counted.
#[derive(Debug, Default)]
pub struct MemoryArea {
    values: Mutex<Record>,
    unavailable: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryArea {
    /// Creates an empty, available area.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an area preloaded with `values`.
    #[must_use]
    pub fn with_values(values: Record) -> Self {
        Self {
            values: Mutex::new(values),
            ..Self::default()
        }
    }

    /// Makes the area answer reads with `None` (or stop doing so).
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        !self.unavailable.load(Ordering::SeqCst)
    }

    /// Number of successful `set` calls so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Copy of everything stored.
    pub async fn snapshot(&self) -> Record {
        self.values.lock().await.clone()
    }
}

#[async_trait]
impl StorageArea for MemoryArea {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, keys: &[&str]) -> StorageResult<Option<Record>> {
        if !self.is_available() {
            return Ok(None);
        }
        let values = self.values.lock().await;
        let record = keys
            .iter()
            .filter_map(|k| values.get(*k).map(|v| ((*k).to_string(), v.clone())))
            .collect();
        Ok(Some(record))
    }

    async fn set(&self, items: Record) -> StorageResult<()> {
        if !self.is_available() {
            return Err(StorageError::TierUnavailable(self.name().into()));
        }
        let mut values = self.values.lock().await;
        values.extend(items);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
