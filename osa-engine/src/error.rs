use crate::config::ConfigError;
use crate::storage::StorageError;
use osa_model::ModelError;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that abort an engine call.
///
/// Per-field sanitization failures are not errors at this level; they are
/// collected in [`crate::Submission::errors`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
