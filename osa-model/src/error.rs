//! Structural errors raised while registering sections and fields.

use thiserror::Error;

/// Result type for registry operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Caller-configuration mistakes detected at registration time.
///
/// These indicate a programming error in the embedding application and abort
/// setup of the affected section.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A section with this id has already been registered.
    #[error("section already registered: {0}")]
    DuplicateSection(String),

    /// No section with this id has been registered.
    #[error("unknown section: {0}")]
    UnknownSection(String),

    /// The section exists but holds no field with this id.
    #[error("field '{field_id}' not found in section '{section_id}'")]
    FieldNotFound {
        section_id: String,
        field_id: String,
    },

    /// The declaration itself is malformed (empty id, missing options, ...).
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}
