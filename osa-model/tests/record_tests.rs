//! Tests for record keys.

use osa_model::RecordKey;

#[test]
fn section_key_uses_section_id() {
    let key = RecordKey::section("wposa_basic");
    assert_eq!(key.storage_key(), "wposa_basic");
    assert_eq!(key.section_id(), "wposa_basic");
    assert_eq!(key.entity(), None);
}

#[test]
fn item_key_is_namespaced_by_entity() {
    let key = RecordKey::item("post-42", "wposa_basic");
    assert_eq!(key.storage_key(), "post-42/wposa_basic");
    assert_eq!(key.section_id(), "wposa_basic");
    assert_eq!(key.entity(), Some("post-42"));
    assert_eq!(key.to_string(), "post-42/wposa_basic");
}

#[test]
fn str_converts_to_section_key() {
    let key: RecordKey = "s1".into();
    assert_eq!(key, RecordKey::section("s1"));
}

#[test]
fn item_and_section_keys_differ() {
    assert_ne!(RecordKey::section("s1"), RecordKey::item("1", "s1"));
}
