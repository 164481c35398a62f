//! [`SkillTree`] builder for scanner, installer and sync scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory with helpers to lay out asset units and reference
/// files.
///
/// # Example
///
/// ```rust,no_run
/// use asset_test_utils::tree::SkillTree;
///
/// let tree = SkillTree::new();
/// tree.skill("skills/ci-helper");
/// tree.file("notes/readme.md", "# Notes\n");
/// tree.assert_file_exists("skills/ci-helper/SKILL.md");
/// ```
pub struct SkillTree {
    temp_dir: TempDir,
}

impl Default for SkillTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SkillTree {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel` inside the tree.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Create a directory holding a `SKILL.md` marker.
    pub fn skill(&self, rel: &str) -> PathBuf {
        self.unit(rel, "SKILL.md")
    }

    /// Create a directory holding the given marker file.
    pub fn unit(&self, rel: &str, marker: &str) -> PathBuf {
        let dir = self.dir(rel);
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        fs::write(
            dir.join(marker),
            format!("---\nname: {name}\ndescription: test unit\n---\n\n# {name}\n"),
        )
        .unwrap();
        dir
    }

    /// Create a directory (and its parents).
    pub fn dir(&self, rel: &str) -> PathBuf {
        let dir = self.path(rel);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Write a file, creating parent directories.
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Read a file relative to the root.
    pub fn read(&self, rel: &str) -> String {
        let path = self.path(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// `file://` URL for a file relative to the root.
    pub fn file_url(&self, rel: &str) -> String {
        let path = self.path(rel);
        let slashed = path.to_string_lossy().replace('\\', "/");
        if slashed.starts_with('/') {
            format!("file://{slashed}")
        } else {
            format!("file:///{slashed}")
        }
    }

    /// # Panics
    /// Panics if `rel` does not exist.
    pub fn assert_file_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// # Panics
    /// Panics if `rel` exists (a dangling symlink counts as existing).
    pub fn assert_file_not_exists(&self, rel: &str) {
        let full_path = self.path(rel);
        assert!(
            fs::symlink_metadata(&full_path).is_err(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// # Panics
    /// Panics if `rel` is not a symlink pointing at `target` (relative to root).
    pub fn assert_link_to(&self, rel: &str, target: &str) {
        let link = self.path(rel);
        let meta = fs::symlink_metadata(&link)
            .unwrap_or_else(|_| panic!("Expected link to exist: {}", link.display()));
        assert!(
            meta.file_type().is_symlink(),
            "Expected a symlink: {}",
            link.display()
        );
        let actual = fs::canonicalize(&link).unwrap();
        let expected = fs::canonicalize(self.path(target)).unwrap();
        assert_eq!(actual, expected, "Link {} points elsewhere", link.display());
    }
}
