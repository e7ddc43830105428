//! Error types for launcher-core

use std::path::PathBuf;

/// Result type for launcher-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while preparing a launch.
///
/// There is no local recovery: every variant aborts the current pass and
/// surfaces to the caller, which must treat the installation plan as
/// unusable.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A non-bundle artifact extension appeared while the startup mode
    /// forbids installable artifacts
    #[error(
        "Extension {extension:?} declares installable artifacts, \
         which the modules-only startup mode does not allow"
    )]
    Policy { extension: String },

    /// A required extension has no recognized handler
    #[error("Unknown required extension {name:?}")]
    UnknownExtension { name: String },

    /// A bundle's `start-level` metadata is not a positive integer
    #[error("Invalid start-level {value:?} on bundle {bundle}: {reason}")]
    InvalidStartLevel {
        bundle: String,
        value: String,
        reason: String,
    },

    /// Writing the cached application descriptor failed; the caller is
    /// expected to terminate the process
    #[error("Failed to persist application descriptor to {path}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: launcher_io::Error,
    },

    /// Resolution, parse, or variable error from launcher-io
    #[error(transparent)]
    Io(#[from] launcher_io::Error),

    /// Structural error from the data model
    #[error(transparent)]
    Model(#[from] launcher_model::Error),
}
