use crate::{EntryId, Timestamp};

/// A user-defined dictionary term.
///
/// Entries are created by the storage gateway (which assigns the id) and are
/// read-only to the content scanner. `id` is `None` only for entries built
/// by a caller that still has to go through a bulk dictionary save, which
/// backfills missing ids from the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub id: Option<EntryId>,
    pub value: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Exact token match when `true`, stemmed match otherwise.
    pub strict_match: bool,
}

impl DictionaryEntry {
    /// Creates an entry without an id, stamped with `now` for both
    /// `created_at` and `updated_at`.
    #[must_use]
    pub fn new(
        value: impl Into<String>,
        description: impl Into<String>,
        strict_match: bool,
        now: Timestamp,
    ) -> Self {
        Self {
            id: None,
            value: value.into(),
            description: description.into(),
            created_at: now,
            updated_at: now,
            strict_match,
        }
    }

    /// Sets the id.
    #[must_use]
    pub fn with_id(mut self, id: EntryId) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns true once the gateway has assigned an id.
    #[must_use]
    pub fn has_id(&self) -> bool {
        self.id.is_some()
    }

    /// Returns true if `word` names the same term as this entry. Both sides
    /// are compared trimmed and lower-cased.
    #[must_use]
    pub fn same_term(&self, word: &str) -> bool {
        normalize(&self.value) == normalize(word)
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
