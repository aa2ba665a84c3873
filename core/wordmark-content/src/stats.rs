use std::collections::BTreeMap;
use wordmark_types::EntryId;

/// Counts gathered during one page pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageStats {
    /// Text nodes handed to the match finder.
    pub text_nodes_scanned: usize,
    /// Text nodes replaced by a highlight sequence.
    pub text_nodes_replaced: usize,
    /// Markers inserted.
    pub matches: usize,
    /// Markers per entry. Entries without an id are not counted here.
    pub per_entry: BTreeMap<EntryId, usize>,
}

impl PageStats {
    pub fn record_match(&mut self, entry_id: Option<EntryId>) {
        self.matches += 1;
        if let Some(id) = entry_id {
            *self.per_entry.entry(id).or_default() += 1;
        }
    }

    /// Distinct entries that matched, in id order.
    pub fn matched_entries(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.per_entry.keys().copied()
    }

    #[must_use]
    pub fn count_for(&self, entry_id: EntryId) -> usize {
        self.per_entry.get(&entry_id).copied().unwrap_or(0)
    }
}
