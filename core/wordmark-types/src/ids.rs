//! Dictionary entry identifiers.
//!
//! Ids are handed out by the storage gateway from a persisted sequence
//! counter, so they are plain positive integers rather than UUIDs.

use std::fmt;
use std::str::FromStr;

/// Unique identifier of a dictionary entry.
///
/// Assigned once by the id sequence and never changed afterwards. Ids are
/// strictly increasing in allocation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u64);

impl EntryId {
    /// The first id a fresh sequence hands out.
    pub const FIRST: Self = Self(1);

    /// Creates an id from its raw sequence value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw sequence value.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns the id allocated right after this one, or `None` once the
    /// id space is exhausted.
    #[must_use]
    pub const fn checked_next(&self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }

    /// Parses an id from its decimal form.
    pub fn parse(s: &str) -> crate::Result<Self> {
        Ok(Self(s.trim().parse()?))
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
