//! Per-page history of highlighted dictionary entries.

use crate::{EntryId, Timestamp};
use std::collections::VecDeque;

/// One highlighted entry on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightingLogItem {
    pub entry_id: EntryId,
    pub url: String,
    pub highlighted_at: Timestamp,
}

/// Bounded log of highlighted entries, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightingLog {
    items: VecDeque<HighlightingLogItem>,
}

impl HighlightingLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a log from items in chronological order.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = HighlightingLogItem>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    /// Appends an item, dropping the oldest ones beyond `capacity`.
    pub fn record(&mut self, item: HighlightingLogItem, capacity: usize) {
        self.items.push_back(item);
        while self.items.len() > capacity {
            self.items.pop_front();
        }
    }

    /// Items in chronological order.
    pub fn items(&self) -> impl Iterator<Item = &HighlightingLogItem> {
        self.items.iter()
    }

    /// Number of times `entry_id` was logged.
    #[must_use]
    pub fn count_for(&self, entry_id: EntryId) -> usize {
        self.items.iter().filter(|i| i.entry_id == entry_id).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
