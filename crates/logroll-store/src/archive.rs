//! gzip archive container with atomic per-entry replace

use crate::{InstanceLock, StoreError};
use flate2::read::GzDecoder;
use flate2::{Compression, GzBuilder};
use logroll_domain::traits::ArchiveStore;
use logroll_domain::ArchiveEntryInfo;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Prefix of staging files; entries may never start with a dot
const STAGING_PREFIX: &str = ".logroll-";
const STAGING_SUFFIX: &str = ".tmp";

/// Archive container holding one gzip file per logical entry
///
/// The container is a directory; each entry is `<dir>/<entry name>`. The gzip
/// header carries the entry name and the source's modification time.
///
/// # Crash Safety
///
/// `replace_entry` follows the write-then-rename pattern:
/// 1. Compress into a staging file in the same directory
/// 2. Stamp the staging file's modification time and `sync_all` it
/// 3. Rename it over the entry
/// 4. Fsync the directory so the rename is durable
///
/// A crash before step 3 leaves the previous entry untouched.
///
/// # Thread Safety
///
/// Entries are independent files, so concurrent replaces of different entries
/// and reads of any entry never interfere.
#[derive(Debug, Clone)]
pub struct GzipArchive {
    dir: PathBuf,
    level: Compression,
}

impl GzipArchive {
    /// Open (and create if absent) an archive directory
    ///
    /// `level` is the gzip compression level, 0-9. Staging files left behind by
    /// an interrupted replace are removed, so a running archiver must hold the
    /// instance lock first (see [`GzipArchive::open_exclusive`]).
    pub fn open<P: AsRef<Path>>(dir: P, level: u32) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let archive = Self {
            dir,
            level: Compression::new(level.min(9)),
        };
        archive.remove_stale_staging()?;
        Ok(archive)
    }

    /// Take the single-instance lock on `dir`, then open it
    ///
    /// Opening removes staging files, which are only stale when no other
    /// archiver is running. A second instance therefore fails with
    /// [`StoreError::Locked`] before it touches the directory.
    pub fn open_exclusive<P: AsRef<Path>>(dir: P, level: u32) -> Result<(Self, InstanceLock), StoreError> {
        let lock = InstanceLock::acquire(dir.as_ref())?;
        let archive = Self::open(dir, level)?;
        Ok((archive, lock))
    }

    /// Open an archive directory for inspection without touching it
    ///
    /// Nothing is created or cleaned up; a missing directory behaves as an
    /// empty archive. Replacing an entry through this handle still works once
    /// the directory exists.
    pub fn inspect<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            level: Compression::default(),
        }
    }

    /// The archive directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Filesystem path of an entry
    pub fn entry_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.dir.join(name))
    }

    fn remove_stale_staging(&self) -> Result<(), StoreError> {
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with(STAGING_PREFIX) && name.ends_with(STAGING_SUFFIX) {
                tracing::warn!("Removing interrupted staging file {}", name);
                fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }

    #[cfg(unix)]
    fn sync_directory(&self) -> Result<(), StoreError> {
        File::open(&self.dir)?.sync_all()?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_directory(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

impl ArchiveStore for GzipArchive {
    type Error = StoreError;

    fn entry_info(&self, name: &str) -> Result<Option<ArchiveEntryInfo>, Self::Error> {
        let path = self.entry_path(name)?;
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_file() {
            return Ok(None);
        }

        Ok(Some(ArchiveEntryInfo {
            name: name.to_string(),
            modified: metadata.modified()?,
            stored_len: metadata.len(),
        }))
    }

    fn read_entry(&self, name: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        let path = self.entry_path(name)?;
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut content = Vec::new();
        GzDecoder::new(file).read_to_end(&mut content)?;
        Ok(Some(content))
    }

    fn replace_entry(
        &self,
        name: &str,
        content: &[u8],
        stamp: Option<SystemTime>,
    ) -> Result<ArchiveEntryInfo, Self::Error> {
        let path = self.entry_path(name)?;

        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(&self.dir)?;

        let mut encoder = GzBuilder::new()
            .filename(name)
            .mtime(gzip_mtime(stamp.unwrap_or_else(SystemTime::now)))
            .write(staging.as_file(), self.level);
        encoder.write_all(content)?;
        encoder.finish()?;

        if let Some(stamp) = stamp {
            stamp_modified(staging.as_file(), name, stamp)?;
        }
        staging.as_file().sync_all()?;

        let file = staging.persist(&path)?;
        self.sync_directory()?;

        let metadata = file.metadata()?;
        Ok(ArchiveEntryInfo {
            name: name.to_string(),
            modified: metadata.modified()?,
            stored_len: metadata.len(),
        })
    }

    fn list_entries(&self) -> Result<Vec<String>, Self::Error> {
        let dir = match fs::read_dir(&self.dir) {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in dir {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if !name.starts_with('.') {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

fn validate_name(name: &str) -> Result<(), StoreError> {
    let invalid = name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if invalid {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Set `file`'s modification time to at least `stamp`
///
/// Filesystems with coarse timestamps (FAT keeps 2 s) round the stamp down,
/// which would make the source look newer than its entry on every scan. The
/// stamp is then moved up to the next representable second instead.
fn stamp_modified(file: &File, name: &str, stamp: SystemTime) -> io::Result<SystemTime> {
    file.set_modified(stamp)?;
    let mut stored = file.metadata()?.modified()?;

    for candidate in coarse_stamps(stamp) {
        if stored >= stamp {
            break;
        }
        file.set_modified(candidate)?;
        stored = file.metadata()?.modified()?;
    }

    if stored < stamp {
        tracing::warn!(
            "{}: archive filesystem cannot hold modification time {:?} (stored {:?}), entry will be merged again",
            name,
            stamp,
            stored
        );
    } else if stored != stamp {
        tracing::debug!("{}: modification time rounded up to {:?}", name, stored);
    }
    Ok(stored)
}

/// Whole-second stamps not earlier than `stamp`, for 1 s and 2 s resolution
fn coarse_stamps(stamp: SystemTime) -> [SystemTime; 2] {
    let since = stamp.duration_since(UNIX_EPOCH).unwrap_or_default();
    let whole = Duration::from_secs(since.as_secs());
    let next = if whole == since { whole } else { whole + Duration::from_secs(1) };
    [UNIX_EPOCH + next, UNIX_EPOCH + next + Duration::from_secs(1)]
}

/// gzip header mtime: seconds since the epoch, 0 when unrepresentable
fn gzip_mtime(time: SystemTime) -> u32 {
    time.duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| u32::try_from(d.as_secs()).ok())
        .unwrap_or(0)
}
