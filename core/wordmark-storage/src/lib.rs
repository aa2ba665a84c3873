//! Tiered key/value storage for Wordmark.
//!
//! Persists the dictionary, the id sequence, the settings record and the
//! highlighting log in a string-keyed store made of two interchangeable
//! tiers.
//!
//! # Architecture
//!
//! - [`StorageArea`] is one tier: a JSON key/value area that signals
//!   unavailability by answering a read with `Ok(None)`
//! - [`MemoryArea`], [`SqliteArea`] and [`OfflineArea`] are the shipped tiers
//! - [`codec`] is the only place records are converted to and from domain
//!   types; every default for a missing field lives there
//! - [`StorageGateway`] picks the active tier once, falls back on an
//!   unavailable read, and serializes id allocation

mod area;
pub mod codec;
mod error;
mod gateway;
mod memory;
mod sqlite;
mod store;

pub use area::{OfflineArea, Record, StorageArea, Tier};
pub use error::{StorageError, StorageResult};
pub use gateway::{
    InitReport, StorageGateway, DICTIONARY_KEY, HIGHLIGHTING_LOG_KEY, ID_SEQUENCE_KEY,
    SETTINGS_KEY, TIER_PROBE_KEY,
};
pub use memory::MemoryArea;
pub use sqlite::SqliteArea;
pub use store::DictionaryStore;
