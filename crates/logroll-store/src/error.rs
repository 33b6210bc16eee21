//! Error types for storage operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Staged entry could not be moved into place
    #[error("Failed to persist entry: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// Entry name would escape the archive directory
    #[error("Invalid entry name: {0}")]
    InvalidName(String),

    /// Source directory is missing or not a directory
    #[error("Source directory not found: {}", .0.display())]
    MissingRoot(PathBuf),

    /// Another instance holds the lock
    #[error("Archive directory is locked by another instance: {}", .0.display())]
    Locked(PathBuf),
}
