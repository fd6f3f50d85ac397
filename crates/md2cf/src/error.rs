//! CLI error types.

use md2cf_adf::AdfError;
use md2cf_config::ConfigError;
use md2cf_confluence::ConfluenceError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Adf(#[from] AdfError),

    #[error("{0}")]
    Confluence(#[from] ConfluenceError),

    #[error("{0}")]
    Validation(String),
}
