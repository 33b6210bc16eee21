//! Archive entry metadata

use std::time::SystemTime;

/// Metadata of a persisted archive entry
///
/// The decompressed content itself is only materialized during a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntryInfo {
    /// Logical entry name, e.g. `jniorboot.log.gz`
    pub name: String,

    /// Modification time of the entry inside the container
    pub modified: SystemTime,

    /// Stored (compressed) size in bytes
    pub stored_len: u64,
}
