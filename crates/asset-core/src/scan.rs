//! Asset unit discovery
//!
//! A directory is a unit if and only if it directly contains the marker
//! file. Once a unit is found the walk does not descend into it, so a unit
//! never claims (or duplicates) a descendant unit. Symlinked directories are
//! never followed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{Error, Result};

/// Marker file used when none is configured
pub const DEFAULT_MARKER: &str = "SKILL.md";

/// One installable content package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetUnit {
    /// Absolute path to the unit's directory
    pub root_path: PathBuf,
    /// Marker file, relative to `root_path`
    pub marker_file: PathBuf,
    /// Final segment of `root_path`
    pub name: String,
}

impl AssetUnit {
    pub fn new(root_path: impl Into<PathBuf>, marker_file: impl Into<PathBuf>) -> Self {
        let root_path = root_path.into();
        let name = root_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            root_path,
            marker_file: marker_file.into(),
            name,
        }
    }

    /// Full path of the marker file proving unit-hood.
    pub fn marker_path(&self) -> PathBuf {
        self.root_path.join(&self.marker_file)
    }
}

/// A path the scan could not look into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub message: String,
}

/// Result of one scan: the units found plus non-fatal warnings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub units: Vec<AssetUnit>,
    pub warnings: Vec<ScanWarning>,
}

/// Depth-first discovery of asset units below a root directory.
#[derive(Debug, Clone)]
pub struct AssetScanner {
    marker: PathBuf,
}

impl Default for AssetScanner {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl AssetScanner {
    pub fn new(marker: impl Into<PathBuf>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// Scan `root` for units.
    ///
    /// Entries are visited in file-name order, so the resulting unit order is
    /// stable between runs. Unreadable directories become [`ScanWarning`]s.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScanRoot`] if `root` is missing or not a directory.
    pub fn scan(&self, root: &Path) -> Result<ScanReport> {
        let meta = fs::metadata(root).map_err(|e| Error::ScanRoot {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;
        if !meta.is_dir() {
            return Err(Error::ScanRoot {
                path: root.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }
        let root = dunce::canonicalize(root).map_err(|e| Error::ScanRoot {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut report = ScanReport::default();
        let mut walker = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(&root).to_path_buf();
                    warn!(path = %path.display(), error = %e, "Skipping unreadable path");
                    report.warnings.push(ScanWarning {
                        path,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            // Symlinks report as symlinks here, not directories
            if !entry.file_type().is_dir() {
                continue;
            }

            let dir = entry.path();
            match self.has_marker(dir) {
                Ok(true) => {
                    debug!(unit = %dir.display(), "Found asset unit");
                    report
                        .units
                        .push(AssetUnit::new(dir.to_path_buf(), self.marker.clone()));
                    walker.skip_current_dir();
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(path = %dir.display(), error = %e, "Cannot inspect directory");
                    report.warnings.push(ScanWarning {
                        path: dir.to_path_buf(),
                        message: e.to_string(),
                    });
                    walker.skip_current_dir();
                }
            }
        }

        debug!(
            root = %root.display(),
            units = report.units.len(),
            warnings = report.warnings.len(),
            "Scan complete"
        );
        Ok(report)
    }

    fn has_marker(&self, dir: &Path) -> std::io::Result<bool> {
        match fs::metadata(dir.join(&self.marker)) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_name_is_final_segment() {
        let unit = AssetUnit::new("/skills/python3-development", DEFAULT_MARKER);
        assert_eq!(unit.name, "python3-development");
        assert_eq!(
            unit.marker_path(),
            PathBuf::from("/skills/python3-development/SKILL.md")
        );
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AssetScanner::default().scan(&dir.path().join("missing"));
        assert!(matches!(result, Err(Error::ScanRoot { .. })));
    }
}
