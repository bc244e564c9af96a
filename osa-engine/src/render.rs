//! Rendering host boundary.
//!
//! The engine decides what to show (fields in order, current values, field
//! errors); the host decides how. Nothing here produces markup.

use crate::submission::FieldError;
use osa_model::{FieldSchema, Section};
use serde_json::Value;

/// One field handed to a [`RenderHost`].
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    pub section: &'a Section,
    pub schema: &'a FieldSchema,
    /// Stored value or the field default; `None` for display-only fields.
    pub value: Option<&'a Value>,
    /// Errors from the last submission that target this field.
    pub errors: &'a [&'a FieldError],
}

impl FieldView<'_> {
    /// Form input name, `section[field]`.
    pub fn input_name(&self) -> String {
        self.schema.label_for()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Presents sections and fields to the user.
pub trait RenderHost {
    /// Called once per section before its fields.
    fn render_section(&mut self, _section: &Section) {}

    fn render_field(&mut self, field: FieldView<'_>);
}
