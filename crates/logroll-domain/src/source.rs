//! Source file module - live logs owned by an external writer

use std::path::PathBuf;
use std::time::SystemTime;

/// A live, growing, append-mostly text log
///
/// Only metadata is held here; content is read on demand through
/// [`SourceCatalog::read_source`](crate::traits::SourceCatalog::read_source)
/// so that a scan never touches file bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// File name (basename), e.g. `jniorboot.log.bak`
    pub name: String,

    /// Full path to the file
    pub path: PathBuf,

    /// Last modification time as reported by the filesystem
    pub modified: SystemTime,

    /// Size in bytes at scan time
    pub len: u64,
}

impl SourceFile {
    /// Create a new source file description
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, modified: SystemTime, len: u64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            modified,
            len,
        }
    }
}

/// Derive the logical archive entry name for a source file name
///
/// Strips `.{source_extension}` and appends `.{archive_extension}`, so
/// `jniorboot.log.bak` becomes `jniorboot.log.gz`. Names lacking the source
/// suffix keep their full name.
///
/// # Examples
///
/// ```
/// use logroll_domain::archive_name;
///
/// assert_eq!(archive_name("jniorboot.log.bak", "bak", "gz"), "jniorboot.log.gz");
/// assert_eq!(archive_name("events.txt", "bak", "gz"), "events.txt.gz");
/// ```
pub fn archive_name(source_name: &str, source_extension: &str, archive_extension: &str) -> String {
    let suffix = format!(".{}", source_extension);
    let stem = match source_name.strip_suffix(&suffix) {
        Some(stem) if !stem.is_empty() => stem,
        _ => source_name,
    };
    format!("{}.{}", stem, archive_extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_name_strips_source_extension() {
        assert_eq!(archive_name("jniorboot.log.bak", "bak", "gz"), "jniorboot.log.gz");
        assert_eq!(archive_name("access.log.bak", "bak", "zip"), "access.log.zip");
    }

    #[test]
    fn test_archive_name_without_suffix() {
        assert_eq!(archive_name("plain", "bak", "gz"), "plain.gz");
        // A bare ".bak" has no stem to keep
        assert_eq!(archive_name(".bak", "bak", "gz"), ".bak.gz");
    }

    #[test]
    fn test_source_file_new() {
        let file = SourceFile::new("a.bak", "/a.bak", SystemTime::UNIX_EPOCH, 12);
        assert_eq!(file.name, "a.bak");
        assert_eq!(file.path, PathBuf::from("/a.bak"));
        assert_eq!(file.len, 12);
    }
}
