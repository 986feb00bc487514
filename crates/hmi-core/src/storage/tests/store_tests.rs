use serde_json::json;
use tempfile::tempdir;

use crate::base::ErrorKind;
use crate::storage::{JsonFileStore, KeyValueStore, MemoryStore};

#[test]
fn test_memory_store_get_returns_default_for_missing_key() {
    let store = MemoryStore::new();
    assert_eq!(store.get("missing", json!(42)), json!(42));
    assert!(!store.contains("missing"));
}

#[test]
fn test_memory_store_set_get_remove() {
    let store = MemoryStore::new();
    store.set("a", json!("x"));
    store.set("b", json!([1, 2]));

    assert_eq!(store.get("a", json!(null)), json!("x"));
    assert_eq!(store.keys(), vec!["a".to_string(), "b".to_string()]);
    assert_eq!(store.remove("a"), Some(json!("x")));
    assert_eq!(store.remove("a"), None);
    assert!(store.sync().is_ok());
}

#[test]
fn test_json_file_store_missing_file_is_empty() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("settings.json")).unwrap();
    assert!(store.keys().is_empty());
    assert!(!store.path().exists());
}

#[test]
fn test_json_file_store_sync_persists_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let store = JsonFileStore::open(&path).unwrap();
    store.set("alarms/limit", json!(10));
    store.set("ui/theme", json!("dark"));
    // Nothing on disk until sync
    assert!(!path.exists());
    store.sync().unwrap();
    assert!(path.exists());

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.get("alarms/limit", json!(0)), json!(10));
    assert_eq!(reopened.get("ui/theme", json!("")), json!("dark"));
}

#[test]
fn test_json_file_store_sync_overwrites_previous_contents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let store = JsonFileStore::open(&path).unwrap();
    store.set("k", json!(1));
    store.sync().unwrap();
    store.remove("k");
    store.set("other", json!(true));
    store.sync().unwrap();

    let reopened = JsonFileStore::open(&path).unwrap();
    assert!(!reopened.contains("k"));
    assert!(reopened.contains("other"));
    // Only the target file remains; the temp file was renamed over it
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_json_file_store_rejects_malformed_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = JsonFileStore::open(&path).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Parse);
    assert_eq!(err.info().context(), Some(path.display().to_string().as_str()));
}

#[test]
fn test_json_file_store_rejects_non_object() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("list.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    let err = JsonFileStore::open(&path).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Parse);
    assert!(err.message().contains("does not contain a JSON object"));
}

#[test]
fn test_json_file_store_empty_file_is_empty_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.json");
    std::fs::write(&path, "").unwrap();

    let store = JsonFileStore::open(&path).unwrap();
    assert!(store.keys().is_empty());
}
