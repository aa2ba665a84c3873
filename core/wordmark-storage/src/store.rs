use crate::area::Tier;
use crate::error::StorageResult;
use crate::gateway::{InitReport, StorageGateway};
use async_trait::async_trait;
use wordmark_types::{DictionaryEntry, HighlightingLog, Settings};

/// The persistence operations the extension hooks and the content pass rely
/// on.
///
/// [`StorageGateway`] is the production implementation; tests substitute
/// recording fakes.
#[async_trait]
pub trait DictionaryStore: Send + Sync {
    async fn init(&self) -> StorageResult<InitReport>;

    async fn get_dictionary(&self) -> StorageResult<Option<Vec<DictionaryEntry>>>;

    async fn get_settings(&self) -> StorageResult<Settings>;

    async fn add_entry(
        &self,
        value: &str,
        description: &str,
        strict_match: bool,
    ) -> StorageResult<DictionaryEntry>;

    async fn save_dictionary(
        &self,
        dictionary: Vec<DictionaryEntry>,
    ) -> StorageResult<Vec<DictionaryEntry>>;

    async fn save_settings(&self, settings: &Settings) -> StorageResult<()>;

    async fn get_highlighting_log(&self) -> StorageResult<HighlightingLog>;

    async fn save_highlighting_log(&self, log: &HighlightingLog) -> StorageResult<()>;

    /// The tier in use; stores without tiers report [`Tier::Primary`].
    async fn active_tier(&self) -> Tier {
        Tier::Primary
    }
}

#[async_trait]
impl DictionaryStore for StorageGateway {
    async fn init(&self) -> StorageResult<InitReport> {
        StorageGateway::init(self).await
    }

    async fn get_dictionary(&self) -> StorageResult<Option<Vec<DictionaryEntry>>> {
        StorageGateway::get_dictionary(self).await
    }

    async fn get_settings(&self) -> StorageResult<Settings> {
        StorageGateway::get_settings(self).await
    }

    async fn add_entry(
        &self,
        value: &str,
        description: &str,
        strict_match: bool,
    ) -> StorageResult<DictionaryEntry> {
        StorageGateway::add_entry(self, value, description, strict_match).await
    }

    async fn save_dictionary(
        &self,
        dictionary: Vec<DictionaryEntry>,
    ) -> StorageResult<Vec<DictionaryEntry>> {
        StorageGateway::save_dictionary(self, dictionary).await
    }

    async fn save_settings(&self, settings: &Settings) -> StorageResult<()> {
        StorageGateway::save_settings(self, settings).await
    }

    async fn get_highlighting_log(&self) -> StorageResult<HighlightingLog> {
        StorageGateway::get_highlighting_log(self).await
    }

    async fn save_highlighting_log(&self, log: &HighlightingLog) -> StorageResult<()> {
        StorageGateway::save_highlighting_log(self, log).await
    }

    async fn active_tier(&self) -> Tier {
        StorageGateway::active_tier(self).await
    }
}
