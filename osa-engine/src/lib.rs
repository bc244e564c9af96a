//! OSA settings engine.
//!
//! Takes untrusted form input for a registered section, runs every field
//! through its sanitizer and reconciles the result with the stored record.
//! Persistence and presentation are delegated to a [`StorageHost`] and a
//! [`RenderHost`].
//!
//! ```no_run
//! use osa_engine::{MemoryStorage, RawValues, SettingsEngine};
//! use osa_model::{FieldSchema, Registry, Section};
//! use serde_json::json;
//!
//! let mut builder = Registry::builder();
//! builder
//!     .add_section(Section::new("basic", "Basic Settings"))?
//!     .add_field("basic", FieldSchema::text("title", "Title").with_default("Untitled"))?;
//! let registry = builder.build();
//!
//! let engine = SettingsEngine::new(&registry, MemoryStorage::new());
//! let mut raw = RawValues::new();
//! raw.insert("title".into(), json!("Hello"));
//! engine.save("basic", &raw)?;
//! assert_eq!(engine.value("basic", "title")?, json!("Hello"));
//! # Ok::<(), osa_engine::EngineError>(())
//! ```

mod config;
mod engine;
mod error;
mod render;
mod storage;
mod submission;

pub use config::{ConfigError, ConfigResult, EngineConfig, SettingsFile};
pub use engine::{RawValues, SettingsEngine};
pub use error::{EngineError, EngineResult};
pub use render::{FieldView, RenderHost};
pub use storage::{MemoryStorage, StorageError, StorageHost, StorageResult};
pub use submission::{FieldError, FieldErrorKind, Submission};
