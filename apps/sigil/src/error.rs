//! # Application Errors

use sigil_core::SigilError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid manifest: {0}")]
    Manifest(String),

    #[error("Unknown class '{0}'")]
    UnknownClass(String),

    #[error(transparent)]
    Sigil(#[from] SigilError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}
