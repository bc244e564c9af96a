//! Settings files: engine options plus declarative sections.
//!
//! ```toml
//! [engine]
//! strict_fields = true
//! allowed_fields = ["option_page"]
//!
//! [[sections]]
//! id = "basic"
//! title = "Basic Settings"
//!
//! [[sections.fields]]
//! id = "text"
//! type = "text"
//! label = "Text Input"
//! default = "Default Text"
//! ```

use osa_model::{ModelError, Registry, Section};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML settings: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings file declares an invalid registry: {0}")]
    Registry(#[from] ModelError),
}

/// Engine behavior switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Reject submitted ids that are not registered fields of the section.
    #[serde(default = "default_strict_fields")]
    pub strict_fields: bool,

    /// Unregistered ids accepted verbatim even under `strict_fields`
    /// (form bookkeeping such as nonces).
    #[serde(default)]
    pub allowed_fields: BTreeSet<String>,
}

fn default_strict_fields() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict_fields: default_strict_fields(),
            allowed_fields: BTreeSet::new(),
        }
    }
}

impl EngineConfig {
    /// Accepts every unregistered id.
    pub fn permissive() -> Self {
        Self {
            strict_fields: false,
            ..Self::default()
        }
    }

    pub fn allow_field(mut self, field_id: impl Into<String>) -> Self {
        self.allowed_fields.insert(field_id.into());
        self
    }

    /// Whether an unregistered `field_id` passes through unchanged.
    pub fn accepts_unknown(&self, field_id: &str) -> bool {
        !self.strict_fields || self.allowed_fields.contains(field_id)
    }
}

/// Parsed settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl SettingsFile {
    /// Reads a settings file; `.json` files are parsed as JSON, anything else
    /// as TOML.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        };

        match &parsed {
            Ok(file) => info!(
                "Loaded settings from {:?} ({} sections)",
                path,
                file.sections.len()
            ),
            Err(e) => warn!("Failed to parse settings file {:?}: {}", path, e),
        }
        parsed
    }

    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_json_str(contents: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Registers the declared sections in file order and returns the engine
    /// options alongside the frozen registry.
    pub fn into_parts(self) -> ConfigResult<(EngineConfig, Registry)> {
        let mut builder = Registry::builder();
        builder.set_sections(self.sections)?;
        Ok((self.engine, builder.build()))
    }
}
