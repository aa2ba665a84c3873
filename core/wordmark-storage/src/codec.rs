//! Field-keyed storage records.
//!
//! Entries, settings and log items are stored as plain JSON objects with
//! camelCase keys and read back by extracting each field explicitly. This is
//! the single place where older or foreign records are brought up to the
//! current shape; each field that may be missing has its default here:
//!
//! | record   | field              | when absent                 |
//! |----------|--------------------|-----------------------------|
//! | entry    | `id`               | `None` (backfilled on save) |
//! | entry    | `description`      | empty string                |
//! | entry    | `createdAt`        | the Unix epoch              |
//! | entry    | `updatedAt`        | `createdAt`                 |
//! | entry    | `strictMatch`      | `false`                     |
//! | settings | `enableHighlighting` | `true`                    |
//! | settings | `enablePageStats`  | `true`                      |
//! | settings | `timeout`          | [`DEFAULT_TIMEOUT_SECS`]    |
//!
//! A settings field of the wrong type is treated as missing and logged.
//! Defaults are applied on read only and never written back on their own.

use crate::error::{StorageError, StorageResult};
use chrono::DateTime;
use serde_json::{json, Map, Value};
use tracing::warn;
use wordmark_types::{
    DictionaryEntry, EntryId, HighlightingLog, HighlightingLogItem, Settings, Timestamp,
    DEFAULT_TIMEOUT_SECS,
};

// ── Dictionary entries ───────────────────────────────────────────

pub fn serialize_entry(entry: &DictionaryEntry) -> Value {
    let mut record = Map::new();
    if let Some(id) = entry.id {
        record.insert("id".into(), json!(id.get()));
    }
    record.insert("value".into(), json!(entry.value));
    record.insert("description".into(), json!(entry.description));
    record.insert("createdAt".into(), json!(entry.created_at.as_millis()));
    record.insert("updatedAt".into(), json!(entry.updated_at.as_millis()));
    record.insert("strictMatch".into(), json!(entry.strict_match));
    Value::Object(record)
}

pub fn deserialize_entry(input: &Value) -> StorageResult<DictionaryEntry> {
    let record = input
        .as_object()
        .ok_or_else(|| invalid("dictionary entry", "an object", input))?;

    let value = match record.get("value") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => return Err(invalid("value", "a string", other)),
        None => return Err(StorageError::InvalidData("dictionary entry without value".into())),
    };
    let created_at = timestamp_field(record, "createdAt")?.unwrap_or(Timestamp::from_millis(0));
    let updated_at = timestamp_field(record, "updatedAt")?.unwrap_or(created_at);

    Ok(DictionaryEntry {
        id: id_field(record.get("id"))?,
        value,
        description: string_field(record, "description")?.unwrap_or_default(),
        created_at,
        updated_at,
        strict_match: bool_field(record, "strictMatch")?.unwrap_or(false),
    })
}

pub fn serialize_dictionary(dictionary: &[DictionaryEntry]) -> Value {
    Value::Array(dictionary.iter().map(serialize_entry).collect())
}

/// Reads a stored dictionary. A missing or `null` value means the
/// dictionary was never initialized and yields `None`.
pub fn deserialize_dictionary(input: Option<&Value>) -> StorageResult<Option<Vec<DictionaryEntry>>> {
    match input {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items.iter().map(deserialize_entry).collect::<StorageResult<Vec<_>>>().map(Some),
        Some(other) => Err(invalid("dictionary", "an array", other)),
    }
}

// ── Id sequence ──────────────────────────────────────────────────

/// Reads the id sequence. Never-initialized sequences start at the first id.
pub fn deserialize_sequence(input: Option<&Value>) -> StorageResult<EntryId> {
    match input {
        None | Some(Value::Null) => Ok(EntryId::FIRST),
        Some(v) => match v.as_u64() {
            Some(0) => Ok(EntryId::FIRST),
            Some(n) => Ok(EntryId::new(n)),
            None => Err(invalid("idSequenceNumber", "a positive integer", v)),
        },
    }
}

pub fn serialize_sequence(next: EntryId) -> Value {
    json!(next.get())
}

// ── Settings ─────────────────────────────────────────────────────

pub fn serialize_settings(settings: &Settings) -> Value {
    json!({
        "timeout": seconds_value(settings.timeout),
        "enableHighlighting": settings.enable_highlighting,
        "enablePageStats": settings.enable_page_stats,
    })
}

/// Reads a stored settings record, filling every missing or malformed field
/// with its default. A missing or malformed record reads as
/// [`Settings::default`]. Settings never fail a read.
pub fn deserialize_settings(input: Option<&Value>) -> Settings {
    let defaults = Settings::default();
    let record = match input {
        None | Some(Value::Null) => return defaults,
        Some(Value::Object(record)) => record,
        Some(other) => {
            warn!("settings: expected an object, got {other}; using defaults");
            return defaults;
        }
    };

    let timeout = match record.get("timeout") {
        None | Some(Value::Null) => DEFAULT_TIMEOUT_SECS,
        Some(v) => match v.as_f64().filter(|t| t.is_finite() && *t >= 0.0) {
            Some(t) => t,
            None => {
                warn!("settings: timeout {v} is not a non-negative number; using {}", defaults.timeout);
                defaults.timeout
            }
        },
    };

    Settings {
        enable_highlighting: settings_flag(record, "enableHighlighting", defaults.enable_highlighting),
        // Records written before page stats existed lack this field.
        enable_page_stats: settings_flag(record, "enablePageStats", defaults.enable_page_stats),
        timeout,
    }
}

fn settings_flag(record: &Map<String, Value>, key: &str, default: bool) -> bool {
    match record.get(key) {
        None | Some(Value::Null) => default,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            warn!("settings: {key} {other} is not a boolean; using {default}");
            default
        }
    }
}

/// Whole seconds are written as integers, so records stay identical to the
/// ones other hosts write.
fn seconds_value(secs: f64) -> Value {
    if secs.fract() == 0.0 && secs >= 0.0 && secs <= u64::MAX as f64 {
        json!(secs as u64)
    } else {
        json!(secs)
    }
}

// ── Highlighting log ─────────────────────────────────────────────

pub fn serialize_highlighting_log(log: &HighlightingLog) -> Value {
    Value::Array(
        log.items()
            .map(|item| {
                json!({
                    "entryId": item.entry_id.get(),
                    "url": item.url,
                    "highlightedAt": item.highlighted_at.as_millis(),
                })
            })
            .collect(),
    )
}

/// Reads the highlighting log. A missing log reads as empty.
pub fn deserialize_highlighting_log(input: Option<&Value>) -> StorageResult<HighlightingLog> {
    let items = match input {
        None | Some(Value::Null) => return Ok(HighlightingLog::new()),
        Some(Value::Array(items)) => items,
        Some(other) => return Err(invalid("highlightingLog", "an array", other)),
    };

    let mut parsed = Vec::with_capacity(items.len());
    for item in items {
        let record = item
            .as_object()
            .ok_or_else(|| invalid("highlighting log item", "an object", item))?;
        let entry_id = id_field(record.get("entryId"))?
            .ok_or_else(|| StorageError::InvalidData("highlighting log item without entryId".into()))?;
        parsed.push(HighlightingLogItem {
            entry_id,
            url: string_field(record, "url")?.unwrap_or_default(),
            highlighted_at: timestamp_field(record, "highlightedAt")?
                .unwrap_or(Timestamp::from_millis(0)),
        });
    }
    Ok(HighlightingLog::from_items(parsed))
}

// ── Field extraction ─────────────────────────────────────────────

/// Ids of `0` are treated as unassigned, like a missing id.
fn id_field(value: Option<&Value>) -> StorageResult<Option<EntryId>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => match v.as_u64() {
            Some(0) => Ok(None),
            Some(n) => Ok(Some(EntryId::new(n))),
            None => Err(invalid("id", "a positive integer", v)),
        },
    }
}

fn string_field(record: &Map<String, Value>, key: &str) -> StorageResult<Option<String>> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(invalid(key, "a string", other)),
    }
}

fn bool_field(record: &Map<String, Value>, key: &str) -> StorageResult<Option<bool>> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(invalid(key, "a boolean", other)),
    }
}

/// Timestamps are stored as epoch milliseconds; RFC 3339 strings written by
/// other hosts are accepted too.
fn timestamp_field(record: &Map<String, Value>, key: &str) -> StorageResult<Option<Timestamp>> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(Timestamp::from_millis(dt.timestamp_millis())))
            .map_err(|e| StorageError::InvalidData(format!("{key}: {e}"))),
        Some(v) => v
            .as_i64()
            .map(|ms| Some(Timestamp::from_millis(ms)))
            .ok_or_else(|| invalid(key, "epoch milliseconds", v)),
    }
}

fn invalid(field: &str, expected: &str, got: &Value) -> StorageError {
    StorageError::InvalidData(format!("{field}: expected {expected}, got {got}"))
}
