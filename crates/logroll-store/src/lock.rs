//! Single-instance guard

use crate::StoreError;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

const LOCK_FILE: &str = ".logroll.lock";

/// Exclusive advisory lock on an archive directory
///
/// Held for the lifetime of the process; the OS releases it on exit or crash,
/// so a restarted process can always reacquire it.
#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
    _file: File,
}

impl InstanceLock {
    /// Try to acquire the lock for `dir` without blocking
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Locked`] if another process holds it.
    pub fn acquire<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let path = dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        if file.try_lock_exclusive().is_err() {
            return Err(StoreError::Locked(dir.to_path_buf()));
        }

        Ok(Self { path, _file: file })
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
