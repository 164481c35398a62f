//! Symlink inspection and creation
//!
//! All inspection goes through `symlink_metadata` so a link is never
//! confused with whatever it points at.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// What currently occupies a path, without following symlinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Nothing at the path (a dangling symlink is still a `Symlink`)
    Missing,
    /// A symlink; holds the raw link text as stored on disk
    Symlink(PathBuf),
    /// A regular file (or any other non-directory object)
    File,
    /// A real directory
    Directory,
}

/// Inspect `path` without following a final symlink.
pub fn entry_kind(path: &Path) -> Result<EntryKind> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(EntryKind::Missing),
        Err(e) => return Err(Error::io(path, e)),
    };

    let file_type = meta.file_type();
    if file_type.is_symlink() {
        let dest = fs::read_link(path).map_err(|e| Error::io(path, e))?;
        Ok(EntryKind::Symlink(dest))
    } else if file_type.is_dir() {
        Ok(EntryKind::Directory)
    } else {
        Ok(EntryKind::File)
    }
}

/// Resolve raw link text against the directory containing the link.
///
/// Absolute link text is returned unchanged.
pub fn absolutize_link_text(link: &Path, text: &Path) -> PathBuf {
    if text.is_absolute() {
        return text.to_path_buf();
    }
    match link.parent() {
        Some(parent) => parent.join(text),
        None => text.to_path_buf(),
    }
}

/// Whether two paths name the same filesystem object.
///
/// Canonicalizes both sides when possible; falls back to a lexical comparison
/// when either side cannot be resolved (for example a dangling link).
pub fn same_location(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Create a directory symlink at `link` pointing at `source`.
#[cfg(unix)]
pub fn create_dir_link(source: &Path, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(source, link).map_err(|e| Error::io(link, e))
}

/// Create a directory symlink at `link` pointing at `source`.
#[cfg(windows)]
pub fn create_dir_link(source: &Path, link: &Path) -> Result<()> {
    std::os::windows::fs::symlink_dir(source, link).map_err(|e| Error::io(link, e))
}

/// Remove a symlink without touching its destination.
///
/// Refuses (with an `InvalidInput` I/O error) when `link` is not a symlink.
pub fn remove_link(link: &Path) -> Result<()> {
    match entry_kind(link)? {
        EntryKind::Symlink(_) => {}
        _ => {
            return Err(Error::io(
                link,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a symlink"),
            ));
        }
    }

    #[cfg(windows)]
    {
        // Directory symlinks on Windows are removed as directories
        if fs::remove_dir(link).is_ok() {
            return Ok(());
        }
    }

    fs::remove_file(link).map_err(|e| Error::io(link, e))
}

/// Atomically point `link` at `source`, replacing an existing symlink.
///
/// The new link is created beside the old one and renamed over it, so the
/// name is never observed missing. Refuses when `link` is not a symlink.
pub fn replace_link(source: &Path, link: &Path) -> Result<()> {
    if !matches!(entry_kind(link)?, EntryKind::Symlink(_)) {
        return Err(Error::io(
            link,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a symlink"),
        ));
    }

    let staging = link.with_file_name(format!(
        ".{}.{}.link",
        link.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    ));
    if matches!(entry_kind(&staging)?, EntryKind::Symlink(_)) {
        remove_link(&staging)?;
    }

    create_dir_link(source, &staging)?;

    #[cfg(unix)]
    {
        fs::rename(&staging, link).map_err(|e| {
            let _ = fs::remove_file(&staging);
            Error::io(link, e)
        })
    }

    #[cfg(windows)]
    {
        // Renaming over a directory symlink is not allowed on Windows
        remove_link(link)?;
        fs::rename(&staging, link).map_err(|e| Error::io(link, e))
    }
}
