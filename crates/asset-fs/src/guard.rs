//! Advisory cross-process guards
//!
//! A [`FileGuard`] holds an exclusive `fs2` lock on a sidecar file for as
//! long as it lives. Used to serialize read-decide-write sequences on shared
//! state files between concurrently running processes.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

/// An exclusive advisory lock, released on drop.
#[derive(Debug)]
pub struct FileGuard {
    file: File,
    path: PathBuf,
}

impl FileGuard {
    /// Try to take the lock without blocking.
    ///
    /// Creates the guard file (and its parent directory) if needed. Returns
    /// [`Error::LockHeld`] when another handle already owns the lock.
    pub fn try_acquire(path: &Path) -> Result<Self> {
        let file = open_guard_file(path)?;
        match file.try_lock_exclusive() {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Acquired file guard");
                Ok(Self {
                    file,
                    path: path.to_path_buf(),
                })
            }
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Err(Error::LockHeld {
                path: path.to_path_buf(),
            }),
            Err(_) => Err(Error::LockFailed {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Path of the guard file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        tracing::debug!(path = %self.path.display(), "Released file guard");
    }
}

fn open_guard_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| Error::io(path, e))
}
