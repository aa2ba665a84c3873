//! Background hooks driven by the host UI.

use crate::error::ExtensionResult;
use std::sync::Arc;
use tracing::info;
use wordmark_storage::{DictionaryStore, InitReport};
use wordmark_types::DictionaryEntry;

/// What [`Background::add_word`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddWordOutcome {
    Added(DictionaryEntry),
    /// The dictionary already holds the word.
    Duplicate,
    /// The word was empty or whitespace only.
    Ignored,
}

/// Long-lived side of the extension: initializes storage and adds words.
pub struct Background {
    store: Arc<dyn DictionaryStore>,
}

impl Background {
    pub fn new(store: Arc<dyn DictionaryStore>) -> Self {
        Self { store }
    }

    /// Initialization hook: selects the storage tier and writes defaults.
    pub async fn start(&self) -> ExtensionResult<InitReport> {
        let report = self.store.init().await?;
        info!(
            "storage ready on {} tier, initialized {:?}",
            report.tier, report.initialized
        );
        Ok(report)
    }

    /// Adds `word` as a non-strict entry without description, unless the
    /// dictionary already holds it (compared trimmed and case-insensitively).
    ///
    /// The word is stored exactly as given.
    pub async fn add_word(&self, word: &str) -> ExtensionResult<AddWordOutcome> {
        if word.trim().is_empty() {
            return Ok(AddWordOutcome::Ignored);
        }
        let dictionary = self.store.get_dictionary().await?.unwrap_or_default();
        if dictionary.iter().any(|entry| entry.same_term(word)) {
            info!("word {word} is already in the dictionary");
            return Ok(AddWordOutcome::Duplicate);
        }
        let entry = self.store.add_entry(word, "", false).await?;
        Ok(AddWordOutcome::Added(entry))
    }
}
