//! CLI error types.

use tb_config::ConfigError;
use tb_content::ContentError;
use tb_server::ServerError;
use tb_storage::StorageError;
use tb_viewer::PreferenceError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Content(#[from] ContentError),

    #[error("{0}")]
    Server(#[from] ServerError),

    #[error("{0}")]
    Preference(#[from] PreferenceError),

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Validation(String),
}
