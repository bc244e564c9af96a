//! Tests for the SQLite storage host.

use osa_engine::{MemoryStorage, RawValues, SettingsEngine, StorageError, StorageHost};
use osa_model::{FieldSchema, Record, RecordKey, Registry, Section};
use osa_store_sqlite::SqliteStorage;
use pretty_assertions::assert_eq;
use serde_json::json;

fn sample() -> Record {
    json!({"f1": "hello", "count": 3, "colors": ["red"]})
        .as_object()
        .unwrap()
        .clone()
}

fn registry() -> Registry {
    let mut builder = Registry::builder();
    builder
        .add_section(Section::new("s1", "Basic"))
        .unwrap()
        .add_field("s1", FieldSchema::text("f1", "F1").with_default("Default Text"))
        .unwrap();
    builder.build()
}

// ── StorageHost ──────────────────────────────────────────────────

#[test]
fn missing_record_reads_none() {
    let store = SqliteStorage::open_in_memory().unwrap();
    assert_eq!(store.get(&RecordKey::section("s1")).unwrap(), None);
}

#[test]
fn set_then_get_round_trips_the_record() {
    let store = SqliteStorage::open_in_memory().unwrap();
    let key = RecordKey::section("s1");
    store.set(&key, &sample()).unwrap();
    assert_eq!(store.get(&key).unwrap(), Some(sample()));
}

#[test]
fn set_replaces_existing_row() {
    let store = SqliteStorage::open_in_memory().unwrap();
    let key = RecordKey::section("s1");
    store.set(&key, &sample()).unwrap();
    let replacement = json!({"f1": "bye"}).as_object().unwrap().clone();
    store.set(&key, &replacement).unwrap();

    assert_eq!(store.get(&key).unwrap(), Some(replacement));
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn delete_removes_only_that_record() {
    let store = SqliteStorage::open_in_memory().unwrap();
    let page = RecordKey::section("s1");
    let item = RecordKey::item("post-1", "s1");
    store.set(&page, &sample()).unwrap();
    store.set(&item, &sample()).unwrap();

    store.delete(&item).unwrap();
    store.delete(&item).unwrap();
    assert_eq!(store.get(&item).unwrap(), None);
    assert!(store.get(&page).unwrap().is_some());
}

#[test]
fn entities_lists_item_scoped_records() {
    let store = SqliteStorage::open_in_memory().unwrap();
    store.set(&RecordKey::section("s1"), &sample()).unwrap();
    store.set(&RecordKey::item("post-9", "s1"), &sample()).unwrap();
    store.set(&RecordKey::item("post-2", "s1"), &sample()).unwrap();
    store.set(&RecordKey::item("post-5", "s2"), &sample()).unwrap();

    assert_eq!(store.entities("s1").unwrap(), vec!["post-2", "post-9"]);
}

#[test]
fn corrupt_rows_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.db");
    drop(SqliteStorage::new(&path).unwrap());

    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute(
        "INSERT INTO settings_records (record_key, section_id, entity, data) VALUES ('s1', 's1', NULL, 'not json')",
        [],
    )
    .unwrap();
    drop(conn);

    let store = SqliteStorage::new(&path).unwrap();
    let err = store.get(&RecordKey::section("s1")).unwrap_err();
    assert!(matches!(err, StorageError::Corrupt { key, .. } if key == "s1"));
}

// ── persistence ──────────────────────────────────────────────────

#[test]
fn records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.db");
    let key = RecordKey::item("post-1", "s1");

    {
        let store = SqliteStorage::new(&path).unwrap();
        store.set(&key, &sample()).unwrap();
    }

    let store = SqliteStorage::new(&path).unwrap();
    assert_eq!(store.get(&key).unwrap(), Some(sample()));
}

#[test]
fn engine_saves_through_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.db");
    let registry = registry();
    let raw: RawValues = json!({"f1": "hello"}).as_object().unwrap().clone();

    {
        let engine = SettingsEngine::new(&registry, SqliteStorage::new(&path).unwrap());
        assert_eq!(engine.value("s1", "f1").unwrap(), json!("Default Text"));
        engine.save("s1", &raw).unwrap();
    }

    let engine = SettingsEngine::new(&registry, SqliteStorage::new(&path).unwrap());
    assert_eq!(engine.value("s1", "f1").unwrap(), json!("hello"));
}

#[test]
fn sqlite_and_memory_hosts_agree() {
    let registry = registry();
    let raw: RawValues = json!({"f1": "<b>same</b>"}).as_object().unwrap().clone();

    let sqlite = SettingsEngine::new(&registry, SqliteStorage::open_in_memory().unwrap());
    let memory = SettingsEngine::new(&registry, MemoryStorage::new());
    sqlite.save("s1", &raw).unwrap();
    memory.save("s1", &raw).unwrap();

    assert_eq!(sqlite.values("s1").unwrap(), memory.values("s1").unwrap());
}
