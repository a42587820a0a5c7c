//! CLI error types.

use std::path::PathBuf;

use dmdoc_config::ConfigError;
use dmdoc_model::ModelError;
use dmdoc_site::BuildError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read model {}: {source}", path.display())]
    ReadModel {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid model: {0}")]
    Model(#[from] ModelError),

    #[error("{0}")]
    Build(#[from] BuildError),
}
