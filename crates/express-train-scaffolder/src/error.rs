//! Error taxonomy for the scaffolder
//!
//! Validation errors are recoverable (the prompt asks again), registry errors
//! are swallowed by the resolver, and I/O errors abort the run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Latest-version lookup failed (network, HTTP status, or body).
    #[error("registry unavailable: {0}")]
    RegistryUnavailable(String),

    #[error("Version must be a valid semver string.")]
    InvalidFormat { input: String },

    #[error("Sorry, this generator does not support versions of express train previous to 1.0.0")]
    UnsupportedLegacyVersion { input: String },

    #[error("failed to write or read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render template '{id}': {message}")]
    Template { id: String, message: String },

    #[error("invalid template manifest: {0}")]
    Manifest(String),
}

impl ScaffoldError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;
