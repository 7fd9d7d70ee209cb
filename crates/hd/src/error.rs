//! CLI error types.

use hd_config::ConfigError;
use hd_storage::StorageError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("Content not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),
}
