//! Configuration for the extension host.

use crate::error::{ExtensionError, ExtensionResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use wordmark_content::DEFAULT_SKIP_TAGS;
use wordmark_storage::{MemoryArea, OfflineArea, SqliteArea, StorageArea, StorageGateway};

/// Host configuration. Every field has a default, so a config file only
/// needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    /// SQLite file backing the primary tier. `None` keeps the primary tier
    /// in memory.
    pub primary_path: Option<PathBuf>,
    /// Filter directive used when `WORDMARK_LOG` is not set.
    pub log_filter: String,
    /// Maximum number of items kept in the highlighting log.
    pub highlighting_log_capacity: usize,
    /// Elements whose text is never scanned.
    pub skip_tags: Vec<String>,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            primary_path: None,
            log_filter: "info".to_string(),
            highlighting_log_capacity: 100,
            skip_tags: DEFAULT_SKIP_TAGS.iter().map(|t| (*t).to_string()).collect(),
        }
    }
}

impl ExtensionConfig {
    /// Loads a JSON config file.
    pub fn from_json_file(path: &Path) -> ExtensionResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        if config.highlighting_log_capacity == 0 {
            return Err(ExtensionError::Config(format!(
                "{}: highlighting_log_capacity must be at least 1",
                path.display()
            )));
        }
        Ok(config)
    }

    /// Builds the storage gateway: the configured primary tier and an
    /// in-memory fallback.
    ///
    /// A primary file that cannot be opened is replaced by an offline tier,
    /// so the gateway falls back on its first read instead of failing.
    #[must_use]
    pub fn open_gateway(&self) -> StorageGateway {
        let primary: Arc<dyn StorageArea> = match &self.primary_path {
            Some(path) => match SqliteArea::open(path) {
                Ok(area) => {
                    info!("primary storage at {}", path.display());
                    Arc::new(area)
                }
                Err(e) => {
                    warn!("cannot open primary storage at {}: {e}", path.display());
                    Arc::new(OfflineArea)
                }
            },
            None => Arc::new(MemoryArea::new()),
        };
        StorageGateway::new(primary, Arc::new(MemoryArea::new()))
    }
}
