use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted values of one section: field id → sanitized value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Address of a stored record.
///
/// Page-level settings live under the section id. Item-scoped records (values
/// attached to one content item, e.g. a post) are namespaced by the owning
/// entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum RecordKey {
    Section { section_id: String },
    Item { entity: String, section_id: String },
}

impl RecordKey {
    pub fn section(section_id: impl Into<String>) -> Self {
        Self::Section {
            section_id: section_id.into(),
        }
    }

    pub fn item(entity: impl Into<String>, section_id: impl Into<String>) -> Self {
        Self::Item {
            entity: entity.into(),
            section_id: section_id.into(),
        }
    }

    pub fn section_id(&self) -> &str {
        match self {
            Self::Section { section_id } | Self::Item { section_id, .. } => section_id,
        }
    }

    pub fn entity(&self) -> Option<&str> {
        match self {
            Self::Section { .. } => None,
            Self::Item { entity, .. } => Some(entity),
        }
    }

    /// Flat key used by storage hosts: `section` or `entity/section`.
    pub fn storage_key(&self) -> String {
        match self {
            Self::Section { section_id } => section_id.clone(),
            Self::Item { entity, section_id } => format!("{entity}/{section_id}"),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

impl From<&str> for RecordKey {
    fn from(section_id: &str) -> Self {
        Self::section(section_id)
    }
}

impl From<String> for RecordKey {
    fn from(section_id: String) -> Self {
        Self::section(section_id)
    }
}

impl From<&RecordKey> for RecordKey {
    fn from(key: &RecordKey) -> Self {
        key.clone()
    }
}
