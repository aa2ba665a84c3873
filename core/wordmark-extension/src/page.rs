//! The per-page pass.
//!
//! Loads dictionary, settings and highlighting log together, then walks the
//! document synchronously. Nothing in the document changes until all three
//! loads have succeeded.

use crate::config::ExtensionConfig;
use crate::error::ExtensionResult;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use wordmark_content::{
    Content, DictionaryMatchFinder, Document, HighlightGenerator, MarkupInjector, PageStats,
    Stemmer,
};
use wordmark_storage::DictionaryStore;
use wordmark_types::{HighlightingLogItem, Timestamp};

/// Result of one page pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PageReport {
    pub url: String,
    pub stats: PageStats,
    /// Whether highlighting ran at all.
    pub highlighted: bool,
    pub elapsed: Duration,
}

/// Runs page passes against a store with a fixed stemmer.
pub struct ContentScript<S> {
    store: Arc<dyn DictionaryStore>,
    stemmer: S,
    config: ExtensionConfig,
}

impl<S: Stemmer + Clone> ContentScript<S> {
    pub fn new(store: Arc<dyn DictionaryStore>, stemmer: S, config: ExtensionConfig) -> Self {
        Self {
            store,
            stemmer,
            config,
        }
    }

    /// Highlights dictionary terms in `document` and, with page stats on,
    /// records the matched entries in the highlighting log.
    pub async fn process_page(&self, document: &mut Document, url: &str) -> ExtensionResult<PageReport> {
        let started = Instant::now();
        info!("processing URL {url}");

        let (dictionary, settings, mut log) = tokio::try_join!(
            self.store.get_dictionary(),
            self.store.get_settings(),
            self.store.get_highlighting_log(),
        )?;
        let dictionary = dictionary.unwrap_or_else(|| {
            debug!("dictionary not initialized, nothing to highlight");
            Vec::new()
        });

        let content = Content::new(
            settings,
            DictionaryMatchFinder::new(dictionary, self.stemmer.clone()),
            MarkupInjector::new(HighlightGenerator),
        )
        .with_skip_tags(self.config.skip_tags.iter().cloned());
        let stats = content.process_document(document)?;

        if settings.enable_page_stats && stats.matches > 0 {
            let now = Timestamp::now();
            for entry_id in stats.matched_entries() {
                log.record(
                    HighlightingLogItem {
                        entry_id,
                        url: url.to_string(),
                        highlighted_at: now,
                    },
                    self.config.highlighting_log_capacity,
                );
            }
            self.store.save_highlighting_log(&log).await?;
        }

        let elapsed = started.elapsed();
        info!(
            "finished processing {url} in {:.2} seconds ({} matches)",
            elapsed.as_secs_f64(),
            stats.matches
        );
        Ok(PageReport {
            url: url.to_string(),
            stats,
            highlighted: settings.enable_highlighting,
            elapsed,
        })
    }
}
