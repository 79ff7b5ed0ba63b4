use serde_json::json;

use super::*;
use crate::error::StorageError;

#[test]
fn json_file_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("state.json");

    let mut a = JsonFileStorage::new(&path);
    assert_eq!(a.get("k").unwrap(), None);
    a.set("k", json!({"currentIndex": 2})).unwrap();
    a.set("other", json!(true)).unwrap();

    let b = JsonFileStorage::new(&path);
    assert_eq!(b.get("k").unwrap(), Some(json!({"currentIndex": 2})));
    assert_eq!(b.get("other").unwrap(), Some(json!(true)));
}

#[test]
fn json_file_remove_only_drops_one_key() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = JsonFileStorage::new(dir.path().join("state.json"));
    s.set("a", json!(1)).unwrap();
    s.set("b", json!(2)).unwrap();
    s.remove("a").unwrap();
    s.remove("missing").unwrap();
    assert_eq!(s.get("a").unwrap(), None);
    assert_eq!(s.get("b").unwrap(), Some(json!(2)));
}

#[test]
fn corrupt_file_is_reported_on_read_and_replaced_on_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ not json").unwrap();

    let mut s = JsonFileStorage::new(&path);
    assert!(matches!(s.get("k"), Err(StorageError::Json(_))));

    s.set("k", json!("v")).unwrap();
    assert_eq!(s.get("k").unwrap(), Some(json!("v")));
}

#[test]
fn memory_store_clones_share_contents_and_can_fail() {
    let shared = MemoryStorage::new();
    let mut handle = shared.clone();
    handle.set("k", json!(1)).unwrap();
    assert_eq!(shared.peek("k"), Some(json!(1)));
    assert_eq!(shared.writes(), 1);

    shared.set_failing(true);
    assert!(handle.get("k").is_err());
    assert!(handle.set("k", json!(2)).is_err());
    assert_eq!(shared.writes(), 1);
}
