use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use wordmark_storage::{
    MemoryArea, OfflineArea, Record, SqliteArea, StorageArea, StorageError, StorageGateway,
    StorageResult, Tier, DICTIONARY_KEY, ID_SEQUENCE_KEY, SETTINGS_KEY,
};
use wordmark_types::{DictionaryEntry, EntryId, Settings, Timestamp};

fn make_gateway() -> (StorageGateway, Arc<MemoryArea>, Arc<MemoryArea>) {
    let primary = Arc::new(MemoryArea::new());
    let fallback = Arc::new(MemoryArea::new());
    let gateway = StorageGateway::new(primary.clone(), fallback.clone());
    (gateway, primary, fallback)
}

fn record(value: Value) -> Record {
    value.as_object().cloned().unwrap()
}

/// Memory tier whose single-key dictionary reads take a while to answer.
struct SlowDictionaryArea {
    inner: MemoryArea,
    delay: Duration,
}

#[async_trait]
impl StorageArea for SlowDictionaryArea {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn get(&self, keys: &[&str]) -> StorageResult<Option<Record>> {
        if keys == [DICTIONARY_KEY] {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.get(keys).await
    }

    async fn set(&self, items: Record) -> StorageResult<()> {
        self.inner.set(items).await
    }
}

// ── init ─────────────────────────────────────────────────────────

#[tokio::test]
async fn init_on_empty_storage_writes_three_defaults() {
    let (gateway, primary, fallback) = make_gateway();
    let report = gateway.init().await.unwrap();

    assert_eq!(report.tier, Tier::Primary);
    let written: HashSet<_> = report.initialized.iter().copied().collect();
    assert_eq!(
        written,
        HashSet::from([DICTIONARY_KEY, ID_SEQUENCE_KEY, SETTINGS_KEY])
    );
    assert_eq!(primary.write_count(), 3);
    assert_eq!(fallback.write_count(), 0);

    let stored = primary.snapshot().await;
    assert_eq!(stored[DICTIONARY_KEY], json!([]));
    assert_eq!(stored[ID_SEQUENCE_KEY], json!(1));
    assert_eq!(
        stored[SETTINGS_KEY],
        json!({"enableHighlighting": true, "enablePageStats": true, "timeout": 3})
    );
}

#[tokio::test]
async fn second_init_writes_nothing() {
    let (gateway, primary, _) = make_gateway();
    gateway.init().await.unwrap();
    let report = gateway.init().await.unwrap();

    assert!(report.initialized.is_empty());
    assert_eq!(primary.write_count(), 3);
}

#[tokio::test]
async fn init_keeps_existing_values() {
    let primary = Arc::new(MemoryArea::with_values(record(json!({
        "idSequenceNumber": 17,
        "settings": {"timeout": 9, "enableHighlighting": false},
    }))));
    let gateway = StorageGateway::new(primary.clone(), Arc::new(MemoryArea::new()));

    let report = gateway.init().await.unwrap();
    assert_eq!(report.initialized, vec![DICTIONARY_KEY]);

    let stored = primary.snapshot().await;
    assert_eq!(stored[ID_SEQUENCE_KEY], json!(17));
    assert_eq!(stored[SETTINGS_KEY], json!({"timeout": 9, "enableHighlighting": false}));
}

#[tokio::test]
async fn init_switches_to_fallback_when_primary_is_unavailable() {
    let (gateway, primary, fallback) = make_gateway();
    primary.set_available(false);

    let report = gateway.init().await.unwrap();
    assert_eq!(report.tier, Tier::Fallback);
    assert_eq!(report.initialized.len(), 3);
    assert_eq!(fallback.write_count(), 3);
    assert_eq!(primary.write_count(), 0);
}

#[tokio::test]
async fn tier_choice_is_sticky() {
    let (gateway, primary, fallback) = make_gateway();
    primary.set_available(false);
    gateway.init().await.unwrap();

    primary.set_available(true);
    gateway.add_entry("cat", "", false).await.unwrap();

    assert_eq!(gateway.active_tier().await, Tier::Fallback);
    assert!(primary.snapshot().await.is_empty());
    assert_eq!(fallback.snapshot().await[DICTIONARY_KEY].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn offline_primary_falls_back() {
    let fallback = Arc::new(MemoryArea::new());
    let gateway = StorageGateway::new(Arc::new(OfflineArea), fallback.clone());
    let report = gateway.init().await.unwrap();
    assert_eq!(report.tier, Tier::Fallback);
    assert_eq!(fallback.write_count(), 3);
}

// ── getDictionary / getSettings ──────────────────────────────────

#[tokio::test]
async fn absent_dictionary_is_none_not_empty() {
    let (gateway, _, _) = make_gateway();
    assert_eq!(gateway.get_dictionary().await.unwrap(), None);
}

#[tokio::test]
async fn initialized_dictionary_is_empty() {
    let (gateway, _, _) = make_gateway();
    gateway.init().await.unwrap();
    assert_eq!(gateway.get_dictionary().await.unwrap(), Some(vec![]));
}

#[tokio::test]
async fn unavailable_read_retries_on_fallback_once() {
    let primary = Arc::new(MemoryArea::new());
    let fallback = Arc::new(MemoryArea::with_values(record(json!({
        "dictionary": [{"id": 1, "value": "cat", "strictMatch": true}],
    }))));
    let gateway = StorageGateway::new(primary.clone(), fallback);
    primary.set_available(false);

    let dictionary = gateway.get_dictionary().await.unwrap().unwrap();
    assert_eq!(dictionary.len(), 1);
    assert_eq!(dictionary[0].value, "cat");
    assert_eq!(gateway.active_tier().await, Tier::Fallback);
}

#[tokio::test]
async fn both_tiers_unavailable_is_an_error() {
    let (gateway, primary, fallback) = make_gateway();
    primary.set_available(false);
    fallback.set_available(false);

    let err = gateway.get_settings().await.unwrap_err();
    assert!(matches!(err, StorageError::TierUnavailable(_)));
}

#[tokio::test]
async fn settings_without_page_stats_read_as_enabled() {
    let primary = Arc::new(MemoryArea::with_values(record(json!({
        "settings": {"timeout": 5, "enableHighlighting": false},
    }))));
    let gateway = StorageGateway::new(primary.clone(), Arc::new(MemoryArea::new()));

    let settings = gateway.get_settings().await.unwrap();
    assert_eq!(
        settings,
        Settings {
            timeout: 5.0,
            enable_highlighting: false,
            enable_page_stats: true,
        }
    );
    // The default is not written back.
    assert_eq!(primary.write_count(), 0);
}

#[tokio::test]
async fn save_and_get_settings() {
    let (gateway, _, _) = make_gateway();
    let settings = Settings {
        enable_highlighting: false,
        enable_page_stats: false,
        timeout: 10.0,
    };
    gateway.save_settings(&settings).await.unwrap();
    assert_eq!(gateway.get_settings().await.unwrap(), settings);
}

#[tokio::test]
async fn malformed_settings_read_as_defaults() {
    let primary = Arc::new(MemoryArea::with_values(record(json!({
        "settings": {"timeout": "5", "enableHighlighting": false},
    }))));
    let gateway = StorageGateway::new(primary, Arc::new(MemoryArea::new()));

    let settings = gateway.get_settings().await.unwrap();
    assert!(!settings.enable_highlighting);
    assert_eq!(settings.timeout, 3.0);
}

// ── addEntry ─────────────────────────────────────────────────────

#[tokio::test]
async fn add_entry_assigns_id_and_timestamps() {
    let (gateway, primary, _) = make_gateway();
    gateway.init().await.unwrap();

    let before = Timestamp::now();
    let entry = gateway.add_entry("cat", "feline", true).await.unwrap();

    assert_eq!(entry.id, Some(EntryId::new(1)));
    assert_eq!(entry.value, "cat");
    assert_eq!(entry.description, "feline");
    assert!(entry.strict_match);
    assert_eq!(entry.created_at, entry.updated_at);
    assert!(entry.created_at >= before);

    let stored = primary.snapshot().await;
    assert_eq!(stored[ID_SEQUENCE_KEY], json!(2));
    assert_eq!(gateway.get_dictionary().await.unwrap(), Some(vec![entry]));
}

#[tokio::test]
async fn add_entry_writes_dictionary_and_sequence_together() {
    let (gateway, primary, _) = make_gateway();
    gateway.init().await.unwrap();
    let writes = primary.write_count();

    gateway.add_entry("cat", "", false).await.unwrap();
    assert_eq!(primary.write_count(), writes + 1);
}

#[tokio::test]
async fn add_entry_does_not_reject_duplicates() {
    let (gateway, _, _) = make_gateway();
    gateway.init().await.unwrap();
    gateway.add_entry("cat", "", false).await.unwrap();
    gateway.add_entry("cat", "", false).await.unwrap();
    assert_eq!(gateway.get_dictionary().await.unwrap().unwrap().len(), 2);
}

#[tokio::test]
async fn add_entry_on_uninitialized_storage_starts_at_first_id() {
    let (gateway, _, _) = make_gateway();
    let entry = gateway.add_entry("cat", "", false).await.unwrap();
    assert_eq!(entry.id, Some(EntryId::FIRST));
}

#[tokio::test]
async fn add_entry_skips_past_ids_the_sequence_missed() {
    let primary = Arc::new(MemoryArea::with_values(record(json!({
        "dictionary": [{"id": 5, "value": "cat"}],
        "idSequenceNumber": 2,
    }))));
    let gateway = StorageGateway::new(primary, Arc::new(MemoryArea::new()));
    let entry = gateway.add_entry("dog", "", false).await.unwrap();
    assert_eq!(entry.id, Some(EntryId::new(6)));
}

#[tokio::test]
async fn add_entry_fails_when_ids_are_exhausted() {
    let primary = Arc::new(MemoryArea::with_values(record(json!({
        "dictionary": [{"id": u64::MAX, "value": "cat"}],
        "idSequenceNumber": 2,
    }))));
    let gateway = StorageGateway::new(primary.clone(), Arc::new(MemoryArea::new()));

    let err = gateway.add_entry("dog", "", false).await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidData(_)));
    assert_eq!(primary.write_count(), 0);
    assert_eq!(gateway.get_dictionary().await.unwrap().unwrap().len(), 1);
}

#[tokio::test]
async fn save_dictionary_fails_when_ids_are_exhausted() {
    let (gateway, primary, _) = make_gateway();
    let full = DictionaryEntry::new("cat", "", false, Timestamp::now()).with_id(EntryId::new(u64::MAX));
    let fresh = DictionaryEntry::new("dog", "", false, Timestamp::now());

    let err = gateway.save_dictionary(vec![full, fresh]).await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidData(_)));
    assert_eq!(primary.write_count(), 0);
}

#[tokio::test]
async fn init_does_not_clobber_a_concurrent_add() {
    let primary = Arc::new(SlowDictionaryArea {
        inner: MemoryArea::new(),
        delay: Duration::from_millis(50),
    });
    let gateway = StorageGateway::new(primary, Arc::new(MemoryArea::new()));

    let (report, added) = tokio::join!(gateway.init(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        gateway.add_entry("cat", "", false).await
    });
    report.unwrap();
    let added = added.unwrap();

    let dictionary = gateway.get_dictionary().await.unwrap().unwrap();
    assert_eq!(dictionary, vec![added]);
    let next = gateway.add_entry("dog", "", false).await.unwrap();
    assert_eq!(next.id, Some(EntryId::new(2)));
}

#[tokio::test]
async fn add_entry_preserves_unknown_fields_of_existing_records() {
    let primary = Arc::new(MemoryArea::with_values(record(json!({
        "dictionary": [{"id": 1, "value": "cat", "color": "red"}],
        "idSequenceNumber": 2,
    }))));
    let gateway = StorageGateway::new(primary.clone(), Arc::new(MemoryArea::new()));
    gateway.add_entry("dog", "", false).await.unwrap();

    let stored = primary.snapshot().await;
    assert_eq!(stored[DICTIONARY_KEY][0]["color"], json!("red"));
}

#[tokio::test]
async fn concurrent_adds_get_distinct_ids() {
    let (gateway, _, _) = make_gateway();
    gateway.init().await.unwrap();
    let gateway = Arc::new(gateway);

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let gateway = gateway.clone();
            tokio::spawn(async move { gateway.add_entry(&format!("word{i}"), "", false).await })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let entry = handle.await.unwrap().unwrap();
        assert!(ids.insert(entry.id.unwrap()));
    }
    assert_eq!(ids.len(), 20);
    assert_eq!(gateway.get_dictionary().await.unwrap().unwrap().len(), 20);
}

// ── saveDictionary ───────────────────────────────────────────────

#[tokio::test]
async fn save_dictionary_without_missing_ids_writes_as_is() {
    let (gateway, primary, _) = make_gateway();
    gateway.init().await.unwrap();

    let dictionary = vec![
        DictionaryEntry::new("cat", "", true, Timestamp::from_millis(1)).with_id(EntryId::new(1)),
    ];
    let saved = gateway.save_dictionary(dictionary.clone()).await.unwrap();
    assert_eq!(saved, dictionary);
    assert_eq!(primary.snapshot().await[ID_SEQUENCE_KEY], json!(1));
}

#[tokio::test]
async fn save_dictionary_backfills_consecutive_ids_in_order() {
    let (gateway, primary, _) = make_gateway();
    gateway.init().await.unwrap();
    gateway.add_entry("existing", "", false).await.unwrap();

    let mut dictionary = gateway.get_dictionary().await.unwrap().unwrap();
    dictionary.push(DictionaryEntry::new("a", "", false, Timestamp::from_millis(1)));
    dictionary.push(DictionaryEntry::new("b", "", false, Timestamp::from_millis(2)));

    let saved = gateway.save_dictionary(dictionary).await.unwrap();
    let ids: Vec<u64> = saved.iter().map(|e| e.id.unwrap().get()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(primary.snapshot().await[ID_SEQUENCE_KEY], json!(4));
    assert_eq!(gateway.get_dictionary().await.unwrap(), Some(saved));
}

#[tokio::test]
async fn ids_strictly_increase_across_mixed_calls() {
    let (gateway, _, _) = make_gateway();
    gateway.init().await.unwrap();

    let mut allocated = Vec::new();
    for round in 0..5 {
        let entry = gateway.add_entry(&format!("w{round}"), "", false).await.unwrap();
        allocated.push(entry.id.unwrap());

        let mut dictionary = gateway.get_dictionary().await.unwrap().unwrap();
        dictionary.push(DictionaryEntry::new(format!("bulk{round}"), "", true, Timestamp::now()));
        let saved = gateway.save_dictionary(dictionary).await.unwrap();
        allocated.push(saved.last().unwrap().id.unwrap());
    }

    assert!(allocated.windows(2).all(|w| w[0] < w[1]));
    let all: Vec<_> = gateway
        .get_dictionary()
        .await
        .unwrap()
        .unwrap()
        .into_iter()
        .map(|e| e.id.unwrap())
        .collect();
    let unique: HashSet<_> = all.iter().copied().collect();
    assert_eq!(unique.len(), all.len());
}

// ── Highlighting log ─────────────────────────────────────────────

#[tokio::test]
async fn highlighting_log_defaults_to_empty_and_persists() {
    use wordmark_types::{HighlightingLog, HighlightingLogItem};

    let (gateway, _, _) = make_gateway();
    assert!(gateway.get_highlighting_log().await.unwrap().is_empty());

    let mut log = HighlightingLog::new();
    log.record(
        HighlightingLogItem {
            entry_id: EntryId::new(1),
            url: "https://example.com".into(),
            highlighted_at: Timestamp::from_millis(5),
        },
        10,
    );
    gateway.save_highlighting_log(&log).await.unwrap();
    assert_eq!(gateway.get_highlighting_log().await.unwrap(), log);
}

// ── SQLite tier ──────────────────────────────────────────────────

#[tokio::test]
async fn sqlite_primary_persists_across_gateways() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wordmark.db");

    {
        let primary = Arc::new(SqliteArea::open(&path).unwrap());
        let gateway = StorageGateway::new(primary, Arc::new(MemoryArea::new()));
        gateway.init().await.unwrap();
        gateway.add_entry("cat", "feline", true).await.unwrap();
    }

    let primary = Arc::new(SqliteArea::open(&path).unwrap());
    let gateway = StorageGateway::new(primary, Arc::new(MemoryArea::new()));
    let report = gateway.init().await.unwrap();
    assert!(report.initialized.is_empty());

    let dictionary = gateway.get_dictionary().await.unwrap().unwrap();
    assert_eq!(dictionary.len(), 1);
    assert_eq!(dictionary[0].value, "cat");
    let next = gateway.add_entry("dog", "", false).await.unwrap();
    assert_eq!(next.id, Some(EntryId::new(2)));
}
