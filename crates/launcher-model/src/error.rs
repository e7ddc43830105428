//! Error types for launcher-model

/// Result type for launcher-model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building model values
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Artifact coordinate string does not match `group:artifact[:type[:classifier]]:version`
    #[error("Invalid artifact coordinate {coordinate:?}: {reason}")]
    InvalidCoordinate { coordinate: String, reason: String },

    /// Extension object does not carry exactly one payload form
    #[error("Invalid extension {name:?}: {reason}")]
    InvalidExtension { name: String, reason: String },

    /// Configuration key is structurally invalid
    #[error("Invalid configuration key {key:?}: {reason}")]
    InvalidConfigurationKey { key: String, reason: String },
}
