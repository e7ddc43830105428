//! Error types for launcher-io

use std::path::PathBuf;

/// Result type for launcher-io operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in launcher-io operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Feature descriptor content could not be parsed
    #[error("Failed to parse feature from {source_locator}: {message}")]
    Parse {
        source_locator: String,
        message: String,
    },

    /// An artifact reference could not be resolved to a local file
    #[error("Artifact not found: {reference}")]
    ArtifactNotFound { reference: String },

    /// A `${name}` placeholder has no value in overrides or the feature's
    /// variables section
    #[error("Unresolved variable {name:?} in {context}")]
    UnresolvedVariable { name: String, context: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    /// Structural error from the data model
    #[error(transparent)]
    Model(#[from] launcher_model::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
