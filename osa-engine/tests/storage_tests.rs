//! Tests for the in-memory storage host.

use osa_engine::{MemoryStorage, StorageHost};
use osa_model::{Record, RecordKey};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::thread;

fn sample() -> Record {
    json!({"f1": "hello", "n": 3}).as_object().unwrap().clone()
}

#[test]
fn count_tracks_stored_records() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.count().unwrap(), 0);
    storage.set(&RecordKey::section("a"), &sample()).unwrap();
    storage.set(&RecordKey::section("b"), &sample()).unwrap();
    storage.set(&RecordKey::section("a"), &sample()).unwrap();
    assert_eq!(storage.count().unwrap(), 2);
}

#[test]
fn missing_record_reads_none() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.get(&RecordKey::section("s")).unwrap(), None);
}

#[test]
fn set_then_get() {
    let storage = MemoryStorage::new();
    let key = RecordKey::section("s");
    storage.set(&key, &sample()).unwrap();
    assert_eq!(storage.get(&key).unwrap(), Some(sample()));
    assert_eq!(storage.count().unwrap(), 1);
}

#[test]
fn set_replaces_whole_record() {
    let storage = MemoryStorage::new();
    let key = RecordKey::section("s");
    storage.set(&key, &sample()).unwrap();

    let replacement = json!({"other": true}).as_object().unwrap().clone();
    storage.set(&key, &replacement).unwrap();
    assert_eq!(storage.get(&key).unwrap(), Some(replacement));
}

#[test]
fn delete_is_idempotent() {
    let storage = MemoryStorage::new();
    let key = RecordKey::item("post-1", "s");
    storage.set(&key, &sample()).unwrap();
    storage.delete(&key).unwrap();
    storage.delete(&key).unwrap();
    assert_eq!(storage.count().unwrap(), 0);
}

#[test]
fn section_and_item_keys_do_not_collide() {
    let storage = MemoryStorage::new();
    storage.set(&RecordKey::section("s"), &sample()).unwrap();
    assert_eq!(storage.get(&RecordKey::item("e", "s")).unwrap(), None);
}

#[test]
fn shared_storage_across_threads() {
    let storage = Arc::new(MemoryStorage::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let storage = Arc::clone(&storage);
            thread::spawn(move || {
                let key = RecordKey::item(format!("post-{i}"), "s");
                storage.set(&key, &sample()).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(storage.count().unwrap(), 4);
}
