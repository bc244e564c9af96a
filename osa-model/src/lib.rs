//! Declarative settings model for OSA.
//!
//! Defines the data that plugin authors describe and the engine consumes:
//! - [`FieldSchema`]: one input (id, type, default, optional sanitizer override)
//! - [`FieldType`]: the closed set of supported input kinds
//! - [`Section`]: a named, ordered group of fields backed by one stored record
//! - [`RegistryBuilder`] / [`Registry`]: registration phase and its frozen result
//! - [`Record`] / [`RecordKey`]: the persisted key→value map and its address
//!
//! Sanitization rules live in `osa-sanitize`; persistence and the submit
//! pipeline live in `osa-engine`.

mod error;
mod field;
mod record;
mod registry;
mod section;

pub use error::{ModelError, ModelResult};
pub use field::{FieldOptions, FieldSchema, FieldType, SanitizeFn, Sanitized};
pub use record::{Record, RecordKey};
pub use registry::{Registry, RegistryBuilder};
pub use section::Section;
