use crate::field::FieldSchema;
use serde::{Deserialize, Serialize};

/// A named, ordered group of fields persisted as one record.
///
/// The id doubles as the storage-record key and cannot change once the
/// section is registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    id: String,
    pub title: String,
    #[serde(default, alias = "desc", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    fields: Vec<FieldSchema>,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            fields: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Fields in render order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn field(&self, field_id: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    /// Fields that hold a stored value (everything but display-only types).
    pub fn input_fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields
            .iter()
            .filter(|f| !f.field_type.is_display_only())
    }

    /// Inserts or replaces a field by id. Replacement keeps the original
    /// position; returns `true` when an existing field was replaced.
    pub(crate) fn upsert_field(&mut self, mut field: FieldSchema) -> bool {
        field.section_id.clone_from(&self.id);
        match self.fields.iter_mut().find(|f| f.id == field.id) {
            Some(existing) => {
                *existing = field;
                true
            }
            None => {
                self.fields.push(field);
                false
            }
        }
    }

    /// Detaches the fields declared inline (settings files nest them).
    pub(crate) fn take_fields(&mut self) -> Vec<FieldSchema> {
        std::mem::take(&mut self.fields)
    }
}
