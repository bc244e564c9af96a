//! Section registry: a mutable builder for the registration phase and the
//! immutable [`Registry`] it freezes into.

use crate::error::{ModelError, ModelResult};
use crate::field::FieldSchema;
use crate::section::Section;
use std::collections::HashMap;
use tracing::{debug, info};

/// Collects sections and fields during the registration phase.
///
/// Sections are unique by id (a duplicate is an error). Fields upsert by id
/// within their section, keeping their original position when replaced.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    sections: Vec<Section>,
    index: HashMap<String, usize>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a section. Fields declared inline on the section are
    /// registered with it; nothing is registered if any of them is invalid.
    pub fn add_section(&mut self, mut section: Section) -> ModelResult<&mut Self> {
        if section.id().trim().is_empty() {
            return Err(ModelError::InvalidSchema(
                "section declared without an id".into(),
            ));
        }
        if self.index.contains_key(section.id()) {
            return Err(ModelError::DuplicateSection(section.id().to_string()));
        }

        let fields = section.take_fields();
        for field in &fields {
            field.validate()?;
        }
        for field in fields {
            section.upsert_field(field);
        }

        debug!(section_id = %section.id(), fields = section.fields().len(), "Section registered");
        self.index.insert(section.id().to_string(), self.sections.len());
        self.sections.push(section);
        Ok(self)
    }

    /// Registers several sections in order, stopping at the first error.
    pub fn set_sections(
        &mut self,
        sections: impl IntoIterator<Item = Section>,
    ) -> ModelResult<&mut Self> {
        for section in sections {
            self.add_section(section)?;
        }
        Ok(self)
    }

    /// Adds a field to a registered section, replacing any field with the
    /// same id in place.
    pub fn add_field(&mut self, section_id: &str, field: FieldSchema) -> ModelResult<&mut Self> {
        let idx = *self
            .index
            .get(section_id)
            .ok_or_else(|| ModelError::UnknownSection(section_id.to_string()))?;
        field.validate()?;

        let field_id = field.id.clone();
        if self.sections[idx].upsert_field(field) {
            debug!(section_id, field_id = %field_id, "Field replaced");
        }
        Ok(self)
    }

    /// Adds a field only when `predicate` holds; the section must still exist.
    pub fn add_field_if(
        &mut self,
        section_id: &str,
        field: FieldSchema,
        predicate: impl FnOnce() -> bool,
    ) -> ModelResult<&mut Self> {
        if !self.index.contains_key(section_id) {
            return Err(ModelError::UnknownSection(section_id.to_string()));
        }
        if predicate() {
            self.add_field(section_id, field)?;
        } else {
            debug!(section_id, field_id = %field.id, "Field skipped by predicate");
        }
        Ok(self)
    }

    /// Adds several fields to one section in order.
    pub fn set_fields(
        &mut self,
        section_id: &str,
        fields: impl IntoIterator<Item = FieldSchema>,
    ) -> ModelResult<&mut Self> {
        for field in fields {
            self.add_field(section_id, field)?;
        }
        Ok(self)
    }

    pub fn get_field_schema(&self, section_id: &str, field_id: &str) -> ModelResult<&FieldSchema> {
        lookup_field(&self.sections, &self.index, section_id, field_id)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Freezes the registration phase.
    pub fn build(self) -> Registry {
        let field_count: usize = self.sections.iter().map(|s| s.fields().len()).sum();
        info!(
            sections = self.sections.len(),
            fields = field_count,
            "Settings registry built"
        );
        Registry {
            sections: self.sections,
            index: self.index,
        }
    }
}

/// Immutable set of registered sections, shared by reference with the engine.
#[derive(Debug, Default)]
pub struct Registry {
    sections: Vec<Section>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Sections in registration order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.index.get(section_id).map(|&idx| &self.sections[idx])
    }

    /// Like [`Registry::section`], but an unknown id is an error.
    pub fn require_section(&self, section_id: &str) -> ModelResult<&Section> {
        self.section(section_id)
            .ok_or_else(|| ModelError::UnknownSection(section_id.to_string()))
    }

    pub fn get_field_schema(&self, section_id: &str, field_id: &str) -> ModelResult<&FieldSchema> {
        lookup_field(&self.sections, &self.index, section_id, field_id)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn lookup_field<'a>(
    sections: &'a [Section],
    index: &HashMap<String, usize>,
    section_id: &str,
    field_id: &str,
) -> ModelResult<&'a FieldSchema> {
    let idx = index
        .get(section_id)
        .ok_or_else(|| ModelError::UnknownSection(section_id.to_string()))?;
    sections[*idx]
        .field(field_id)
        .ok_or_else(|| ModelError::FieldNotFound {
            section_id: section_id.to_string(),
            field_id: field_id.to_string(),
        })
}
