//! Directory-backed source catalog

use crate::StoreError;
use logroll_domain::traits::SourceCatalog;
use logroll_domain::SourceFile;
use std::fs;
use std::path::{Path, PathBuf};

/// Lists `*.{extension}` files directly inside a root directory
///
/// Subdirectories are not descended into and non-regular files are ignored.
/// Symlinks are followed. A file that cannot be inspected is logged and left
/// out of the listing instead of failing it.
///
/// # Examples
///
/// ```no_run
/// use logroll_domain::traits::SourceCatalog;
/// use logroll_store::DirectorySource;
///
/// let catalog = DirectorySource::new("/", "bak");
/// for source in catalog.list_sources().unwrap() {
///     println!("{}", source.name);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    suffix: String,
}

impl DirectorySource {
    /// Create a catalog over `root` matching files ending in `.{extension}`
    pub fn new<P: AsRef<Path>>(root: P, extension: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            suffix: format!(".{}", extension),
        }
    }

    /// The directory being scanned
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn matches(&self, name: &str) -> bool {
        name.len() > self.suffix.len() && name.ends_with(&self.suffix)
    }
}

impl SourceCatalog for DirectorySource {
    type Error = StoreError;

    fn list_sources(&self) -> Result<Vec<SourceFile>, Self::Error> {
        if !self.root.is_dir() {
            return Err(StoreError::MissingRoot(self.root.clone()));
        }

        let mut sources = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {}: {}", self.root.display(), e);
                    continue;
                }
            };
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                tracing::debug!("Skipping non UTF-8 file name {:?}", entry.file_name());
                continue;
            };
            if !self.matches(&name) {
                continue;
            }

            // A log removed or rotated after the listing only drops out of this pass
            let path = entry.path();
            let (modified, len) = match fs::metadata(&path).and_then(|m| {
                if m.is_file() {
                    m.modified().map(|modified| Some((modified, m.len())))
                } else {
                    Ok(None)
                }
            }) {
                Ok(Some(found)) => found,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", name, e);
                    continue;
                }
            };

            sources.push(SourceFile::new(name, path, modified, len));
        }

        sources.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sources)
    }

    fn read_source(&self, source: &SourceFile) -> Result<Vec<u8>, Self::Error> {
        Ok(fs::read(&source.path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lists_only_matching_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.log.bak"), b"b\n").unwrap();
        fs::write(dir.path().join("a.log.bak"), b"a\n").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::write(dir.path().join(".bak"), b"x").unwrap();
        fs::create_dir(dir.path().join("dir.bak")).unwrap();

        let catalog = DirectorySource::new(dir.path(), "bak");
        let sources = catalog.list_sources().unwrap();

        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a.log.bak", "b.log.bak"]);
        assert_eq!(sources[0].len, 2);
    }

    #[test]
    fn test_empty_root_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let catalog = DirectorySource::new(dir.path(), "bak");
        assert!(catalog.list_sources().unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let catalog = DirectorySource::new(dir.path().join("gone"), "bak");
        assert!(matches!(catalog.list_sources(), Err(StoreError::MissingRoot(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_vanished_source_does_not_fail_listing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.log.bak"), b"a\n").unwrap();
        fs::write(dir.path().join("c.log.bak"), b"c\n").unwrap();
        // Listed by read_dir but gone by the time it is inspected
        std::os::unix::fs::symlink(dir.path().join("deleted"), dir.path().join("b.log.bak")).unwrap();

        let catalog = DirectorySource::new(dir.path(), "bak");
        let sources = catalog.list_sources().unwrap();

        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a.log.bak", "c.log.bak"]);
    }

    #[test]
    fn test_read_source() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("boot.bak"), b"hello\n").unwrap();

        let catalog = DirectorySource::new(dir.path(), "bak");
        let sources = catalog.list_sources().unwrap();
        assert_eq!(catalog.read_source(&sources[0]).unwrap(), b"hello\n");
    }
}
