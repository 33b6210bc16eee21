//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Archiver error
    #[error(transparent)]
    Archiver(#[from] logroll_archiver::ArchiverError),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] logroll_store::StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Archive entry does not exist
    #[error("No archive entry named {0}")]
    EntryNotFound(String),
}
