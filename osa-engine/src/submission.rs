use osa_model::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a submitted field was not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// The sanitizer rejected the raw value.
    InvalidValue,
    /// The field is not registered in the section (strict mode only).
    UnknownField,
}

/// A recoverable per-field failure reported by a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub section_id: String,
    pub field_id: String,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn invalid_value(
        section_id: impl Into<String>,
        field_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            section_id: section_id.into(),
            field_id: field_id.into(),
            kind: FieldErrorKind::InvalidValue,
            message: message.into(),
        }
    }

    pub fn unknown_field(section_id: impl Into<String>, field_id: impl Into<String>) -> Self {
        let section_id = section_id.into();
        let field_id = field_id.into();
        let message = format!("Unknown field '{field_id}' in section '{section_id}'");
        Self {
            section_id,
            field_id,
            kind: FieldErrorKind::UnknownField,
            message,
        }
    }

    /// Input name a form highlights: `section[field]`.
    pub fn target(&self) -> String {
        format!("{}[{}]", self.section_id, self.field_id)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.target(), self.message)
    }
}

/// Outcome of [`crate::SettingsEngine::submit`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submission {
    /// The reconciled record: previous values overlaid with accepted input.
    pub record: Record,
    /// Per-field failures, in submission order.
    pub errors: Vec<FieldError>,
}

impl Submission {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors reported for one field.
    pub fn errors_for<'a>(&'a self, field_id: &'a str) -> impl Iterator<Item = &'a FieldError> {
        self.errors.iter().filter(move |e| e.field_id == field_id)
    }
}
