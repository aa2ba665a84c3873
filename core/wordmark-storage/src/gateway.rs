//! The storage gateway.
//!
//! Owns the two tiers and the choice between them. Tier selection happens on
//! `init` (or on the first unavailable read) and only ever moves from
//! primary to fallback. Dictionary mutations that touch the id sequence run
//! under one write lock, so within a gateway no two of them can observe the
//! same sequence value.

use crate::area::{Record, StorageArea, Tier};
use crate::codec;
use crate::error::{StorageError, StorageResult};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use wordmark_types::{DictionaryEntry, EntryId, HighlightingLog, Settings, Timestamp};

pub const DICTIONARY_KEY: &str = "dictionary";
pub const ID_SEQUENCE_KEY: &str = "idSequenceNumber";
pub const SETTINGS_KEY: &str = "settings";
pub const HIGHLIGHTING_LOG_KEY: &str = "highlightingLog";
/// Read from the primary tier only to find out whether it answers.
pub const TIER_PROBE_KEY: &str = "tierProbe";

/// Outcome of [`StorageGateway::init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    /// The tier selected for the rest of the gateway's life.
    pub tier: Tier,
    /// Keys that were missing and got their default written.
    pub initialized: Vec<&'static str>,
}

/// Tiered persistence for the dictionary, id sequence and settings.
pub struct StorageGateway {
    primary: Arc<dyn StorageArea>,
    fallback: Arc<dyn StorageArea>,
    tier: RwLock<Tier>,
    /// Held across every read-modify-write of the dictionary or the id
    /// sequence.
    write_lock: Mutex<()>,
}

impl StorageGateway {
    /// Creates a gateway that starts on the primary tier.
    pub fn new(primary: Arc<dyn StorageArea>, fallback: Arc<dyn StorageArea>) -> Self {
        Self {
            primary,
            fallback,
            tier: RwLock::new(Tier::Primary),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the tier currently in use.
    pub async fn active_tier(&self) -> Tier {
        *self.tier.read().await
    }

    fn area(&self, tier: Tier) -> &Arc<dyn StorageArea> {
        match tier {
            Tier::Primary => &self.primary,
            Tier::Fallback => &self.fallback,
        }
    }

    async fn switch_to_fallback(&self) {
        let mut tier = self.tier.write().await;
        if *tier == Tier::Primary {
            warn!(
                "switching from {} to {} storage",
                self.primary.name(),
                self.fallback.name()
            );
            *tier = Tier::Fallback;
        }
    }

    // ── Initialization ───────────────────────────────────────────

    /// Selects the tier and writes defaults for any missing key.
    ///
    /// Existing values are never overwritten, so calling this again is a
    /// no-op write-wise. Runs under the write lock, so a concurrent
    /// `add_entry` lands either before the defaults check or after it.
    pub async fn init(&self) -> StorageResult<InitReport> {
        let _guard = self.write_lock.lock().await;

        match self.primary.get(&[TIER_PROBE_KEY]).await {
            Ok(Some(_)) => info!("using {} storage", self.primary.name()),
            Ok(None) => self.switch_to_fallback().await,
            Err(e) => {
                warn!("primary storage probe failed: {e}");
                self.switch_to_fallback().await;
            }
        }

        let default_settings = codec::serialize_settings(&Settings::default());
        let (dictionary, sequence, settings) = tokio::join!(
            self.ensure_default(DICTIONARY_KEY, json!([])),
            self.ensure_default(ID_SEQUENCE_KEY, codec::serialize_sequence(EntryId::FIRST)),
            self.ensure_default(SETTINGS_KEY, default_settings),
        );

        let mut initialized = Vec::new();
        for (key, written) in [
            (DICTIONARY_KEY, dictionary?),
            (ID_SEQUENCE_KEY, sequence?),
            (SETTINGS_KEY, settings?),
        ] {
            if written {
                initialized.push(key);
            }
        }

        Ok(InitReport {
            tier: self.active_tier().await,
            initialized,
        })
    }

    async fn ensure_default(&self, key: &'static str, default: Value) -> StorageResult<bool> {
        let record = self.read(&[key]).await?;
        if matches!(record.get(key), None | Some(Value::Null)) {
            let mut items = Record::new();
            items.insert(key.to_string(), default);
            self.write(items).await?;
            info!("initialized {key}");
            return Ok(true);
        }
        Ok(false)
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Reads from the active tier, falling back once if it does not answer.
    async fn read(&self, keys: &[&str]) -> StorageResult<Record> {
        let tier = self.active_tier().await;
        if let Some(record) = self.area(tier).get(keys).await? {
            return Ok(record);
        }
        if tier == Tier::Primary {
            self.switch_to_fallback().await;
            if let Some(record) = self.fallback.get(keys).await? {
                return Ok(record);
            }
        }
        Err(StorageError::TierUnavailable(format!(
            "no tier answered a read of {}",
            keys.join(", ")
        )))
    }

    async fn write(&self, items: Record) -> StorageResult<()> {
        let tier = self.active_tier().await;
        self.area(tier).set(items).await
    }

    /// Returns the stored dictionary, or `None` if it was never initialized.
    pub async fn get_dictionary(&self) -> StorageResult<Option<Vec<DictionaryEntry>>> {
        let record = self.read(&[DICTIONARY_KEY]).await?;
        codec::deserialize_dictionary(record.get(DICTIONARY_KEY))
    }

    /// Returns the stored settings with defaults filled in.
    pub async fn get_settings(&self) -> StorageResult<Settings> {
        let record = self.read(&[SETTINGS_KEY]).await?;
        Ok(codec::deserialize_settings(record.get(SETTINGS_KEY)))
    }

    /// Returns the highlighting log; empty if none was saved yet.
    pub async fn get_highlighting_log(&self) -> StorageResult<HighlightingLog> {
        let record = self.read(&[HIGHLIGHTING_LOG_KEY]).await?;
        codec::deserialize_highlighting_log(record.get(HIGHLIGHTING_LOG_KEY))
    }

    // ── Writes ───────────────────────────────────────────────────

    /// Appends a new entry and advances the id sequence in one write.
    ///
    /// Duplicate terms are not rejected here.
    pub async fn add_entry(
        &self,
        value: &str,
        description: &str,
        strict_match: bool,
    ) -> StorageResult<DictionaryEntry> {
        let _guard = self.write_lock.lock().await;

        let mut record = self.read(&[DICTIONARY_KEY, ID_SEQUENCE_KEY]).await?;
        let mut raw = match record.remove(DICTIONARY_KEY) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(StorageError::InvalidData(format!(
                    "dictionary: expected an array, got {other}"
                )));
            }
        };

        let sequence = codec::deserialize_sequence(record.get(ID_SEQUENCE_KEY))?;
        let highest = raw
            .iter()
            .filter_map(|item| item.get("id").and_then(Value::as_u64))
            .max()
            .map(EntryId::new);
        let id = next_free_id(sequence, highest)?;

        let entry = DictionaryEntry::new(value, description, strict_match, Timestamp::now()).with_id(id);
        raw.push(codec::serialize_entry(&entry));

        let mut items = Record::new();
        items.insert(DICTIONARY_KEY.to_string(), Value::Array(raw));
        items.insert(ID_SEQUENCE_KEY.to_string(), codec::serialize_sequence(successor(id)?));
        self.write(items).await?;

        info!("word {} has been added with id {}", entry.value, id);
        Ok(entry)
    }

    /// Replaces the whole dictionary.
    ///
    /// Entries without an id get consecutive ids from the sequence, in
    /// dictionary order; the sequence and the dictionary are then written
    /// together. Returns the dictionary as stored.
    pub async fn save_dictionary(
        &self,
        mut dictionary: Vec<DictionaryEntry>,
    ) -> StorageResult<Vec<DictionaryEntry>> {
        let _guard = self.write_lock.lock().await;

        let mut items = Record::new();
        if dictionary.iter().all(DictionaryEntry::has_id) {
            items.insert(DICTIONARY_KEY.to_string(), codec::serialize_dictionary(&dictionary));
            self.write(items).await?;
            info!("saved dictionary of {} entries", dictionary.len());
            return Ok(dictionary);
        }

        let record = self.read(&[ID_SEQUENCE_KEY]).await?;
        let sequence = codec::deserialize_sequence(record.get(ID_SEQUENCE_KEY))?;
        let highest = dictionary.iter().filter_map(|e| e.id).max();
        let mut next = next_free_id(sequence, highest)?;
        for entry in dictionary.iter_mut().filter(|e| !e.has_id()) {
            entry.id = Some(next);
            next = successor(next)?;
        }

        items.insert(ID_SEQUENCE_KEY.to_string(), codec::serialize_sequence(next));
        items.insert(DICTIONARY_KEY.to_string(), codec::serialize_dictionary(&dictionary));
        self.write(items).await?;
        info!("saved the dictionary, new id sequence number: {next}");
        Ok(dictionary)
    }

    /// Replaces the settings record.
    pub async fn save_settings(&self, settings: &Settings) -> StorageResult<()> {
        let mut items = Record::new();
        items.insert(SETTINGS_KEY.to_string(), codec::serialize_settings(settings));
        self.write(items).await?;
        info!("saved the settings");
        Ok(())
    }

    /// Replaces the highlighting log.
    pub async fn save_highlighting_log(&self, log: &HighlightingLog) -> StorageResult<()> {
        let mut items = Record::new();
        items.insert(
            HIGHLIGHTING_LOG_KEY.to_string(),
            codec::serialize_highlighting_log(log),
        );
        self.write(items).await?;
        debug!("saved highlighting log of {} items", log.len());
        Ok(())
    }
}

/// The sequence value to allocate from. Normally the stored sequence; if a
/// stored id is already at or past it, allocation continues after that id.
fn next_free_id(sequence: EntryId, highest: Option<EntryId>) -> StorageResult<EntryId> {
    match highest {
        Some(h) if h >= sequence => {
            warn!("id sequence {sequence} is behind stored id {h}");
            successor(h)
        }
        _ => Ok(sequence),
    }
}

fn successor(id: EntryId) -> StorageResult<EntryId> {
    id.checked_next()
        .ok_or_else(|| StorageError::InvalidData(format!("id sequence exhausted after {id}")))
}
