//! Error types for Archiver operations

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during Archiver operations
#[derive(Error, Debug)]
pub enum ArchiverError {
    /// Archive container error
    #[error("Archive error: {0}")]
    Store(String),

    /// Source catalog error (listing or reading a log)
    #[error("Source error: {0}")]
    Source(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),

    /// A merge pass exceeded its liveness budget
    #[error("Merge pass exceeded its {0:?} budget")]
    PassTimeout(Duration),
}
