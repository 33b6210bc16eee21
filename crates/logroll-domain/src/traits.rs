//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the merge logic and the filesystem.
//! Infrastructure implementations live in logroll-store.

use crate::{ArchiveEntryInfo, SourceFile};
use std::time::SystemTime;

/// Trait for enumerating and reading live source logs
///
/// Implementations only ever read; sources are owned by their writers.
pub trait SourceCatalog {
    /// Error type for catalog operations
    type Error;

    /// List every candidate source file
    ///
    /// An empty list is a valid answer, not an error.
    fn list_sources(&self) -> Result<Vec<SourceFile>, Self::Error>;

    /// Read the full current content of a source file
    fn read_source(&self, source: &SourceFile) -> Result<Vec<u8>, Self::Error>;
}

/// Trait for the persistent, compressed archive container
///
/// Implemented by the infrastructure layer (logroll-store)
pub trait ArchiveStore {
    /// Error type for store operations
    type Error;

    /// Look up an entry's metadata without decompressing it
    fn entry_info(&self, name: &str) -> Result<Option<ArchiveEntryInfo>, Self::Error>;

    /// Read and decompress an entry
    fn read_entry(&self, name: &str) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Compress `content` and atomically replace the entry `name`
    ///
    /// Readers must observe either the previous entry or the new one, never a
    /// partial write. When `stamp` is given it becomes the entry's modification time;
    /// a container that cannot store it exactly must round it up, never down, or the
    /// source will look newer than its entry on every scan.
    fn replace_entry(
        &self,
        name: &str,
        content: &[u8],
        stamp: Option<SystemTime>,
    ) -> Result<ArchiveEntryInfo, Self::Error>;

    /// List all entry names in the container
    fn list_entries(&self) -> Result<Vec<String>, Self::Error>;
}
