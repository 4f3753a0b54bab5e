//! Unit tests for history ordering, eviction and persistence.

use super::*;
use tempfile::tempdir;

fn filled(backend: MemoryBackend, count: usize) -> PromptHistoryStore<MemoryBackend> {
    let mut store = PromptHistoryStore::open(backend);
    for i in 1..=count {
        store.add(format!("prompt {}", i), format!("=A{}", i), format!("row {}", i));
    }
    store
}

#[test]
fn newest_entry_comes_first() {
    let store = filled(MemoryBackend::new(), 3);
    let prompts: Vec<&str> = store.list().iter().map(|e| e.prompt.as_str()).collect();
    assert_eq!(prompts, vec!["prompt 3", "prompt 2", "prompt 1"]);
}

#[test]
fn eleventh_add_evicts_the_oldest() {
    let store = filled(MemoryBackend::new(), 11);

    assert_eq!(store.len(), HISTORY_LIMIT);
    assert_eq!(store.list()[0].prompt, "prompt 11");
    assert_eq!(store.list()[9].prompt, "prompt 2");
    assert!(store.list().iter().all(|e| e.prompt != "prompt 1"));
}

#[test]
fn clear_empties_list_and_storage() {
    let mut store = filled(MemoryBackend::new(), 4);
    assert!(store.backend().value(HISTORY_KEY).is_some());

    store.clear();
    assert!(store.list().is_empty());
    assert!(store.backend().value(HISTORY_KEY).is_none());

    // Idempotent.
    store.clear();
    assert!(store.is_empty());
}

#[test]
fn entries_survive_reopen() {
    let store = filled(MemoryBackend::new(), 2);
    let reopened = PromptHistoryStore::open(store.into_backend());

    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.get(0).unwrap().formula, "=A2");
    assert_eq!(reopened.get(1).unwrap().explanation, "row 1");
    assert!(reopened.get(2).is_none());
}

#[test]
fn persisted_form_is_a_json_array_of_entries() {
    let store = filled(MemoryBackend::new(), 1);
    let raw = store.backend().value(HISTORY_KEY).unwrap();
    let value: serde_json::Value = serde_json::from_str(raw).unwrap();

    let first = &value.as_array().unwrap()[0];
    assert_eq!(first["prompt"], "prompt 1");
    assert_eq!(first["formula"], "=A1");
    assert_eq!(first["explanation"], "row 1");
    assert!(first["timestamp"].as_str().unwrap().contains('T'));
}

#[test]
fn quota_failure_keeps_in_memory_list() {
    let mut store = PromptHistoryStore::open(MemoryBackend::with_quota(16));
    let entry = store.add("a prompt long enough to blow the quota", "=A1", "");

    assert_eq!(entry.formula, "=A1");
    assert_eq!(store.len(), 1);
    assert!(store.backend().value(HISTORY_KEY).is_none());
}

#[test]
fn corrupt_storage_opens_empty() {
    let mut backend = MemoryBackend::new();
    backend.save(HISTORY_KEY, "{not json").unwrap();

    let mut store = PromptHistoryStore::open(backend);
    assert!(store.is_empty());

    store.add("p", "=1", "");
    assert_eq!(store.len(), 1);
}

#[test]
fn oversized_stored_list_is_capped_on_open() {
    let entries: Vec<HistoryEntry> = (0..15)
        .map(|i| HistoryEntry::new(format!("p{}", i), "=1", ""))
        .collect();
    let mut backend = MemoryBackend::new();
    backend
        .save(HISTORY_KEY, &serde_json::to_string(&entries).unwrap())
        .unwrap();

    let store = PromptHistoryStore::open(backend);
    assert_eq!(store.len(), HISTORY_LIMIT);
    assert_eq!(store.list()[0].prompt, "p0");
}

#[test]
fn file_backend_round_trips_through_disk() {
    let dir = tempdir().unwrap();

    let mut store = PromptHistoryStore::open(FileBackend::new(dir.path()));
    store.add("sum column B", "=SUM(B:B)", "Adds column B.");
    assert!(dir.path().join("xslgpt_prompt_history.json").exists());

    let reopened = PromptHistoryStore::open(FileBackend::new(dir.path()));
    assert_eq!(reopened.list(), store.list());

    let mut reopened = reopened;
    reopened.clear();
    assert!(!dir.path().join("xslgpt_prompt_history.json").exists());
    reopened.clear();
}

#[test]
fn file_backend_missing_dir_loads_nothing() {
    let dir = tempdir().unwrap();
    let backend = FileBackend::new(dir.path().join("not-yet-created"));
    assert!(backend.load(HISTORY_KEY).unwrap().is_none());
}
