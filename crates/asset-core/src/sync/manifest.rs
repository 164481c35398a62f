//! Sync manifest
//!
//! Declares the remote pages to mirror and where they land locally:
//!
//! ```toml
//! cooldown_hours = 72
//! references_dir = "references"
//! index_file = "SKILL.md"
//!
//! [[sources]]
//! path = "ci/yaml/index.md"
//! url = "https://gitlab.com/gitlab-org/gitlab/-/raw/master/doc/ci/yaml/index.md"
//! ```

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use asset_fs::ConfigStore;
use serde::{Deserialize, Serialize};

use super::lock::DEFAULT_COOLDOWN_HOURS;
use crate::{Error, Result};

/// Default manifest file name inside the working directory
pub const MANIFEST_FILENAME: &str = "sync.toml";

/// One remote page and its local destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSource {
    /// Destination, relative to `references_dir`
    pub path: PathBuf,
    /// `http(s)://` or `file://` location of the content
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncManifest {
    #[serde(default = "default_cooldown_hours")]
    pub cooldown_hours: u32,
    #[serde(default = "default_references_dir")]
    pub references_dir: PathBuf,
    /// Remove Hugo shortcode blocks from fetched pages
    #[serde(default = "default_strip_shortcodes")]
    pub strip_shortcodes: bool,
    /// Rewrite relative links of fetched pages to local copies or absolute URLs
    #[serde(default = "default_rewrite_links")]
    pub rewrite_links: bool,
    /// File whose documentation index section is regenerated after a sync
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_file: Option<PathBuf>,
    #[serde(default)]
    pub sources: Vec<SyncSource>,
}

fn default_cooldown_hours() -> u32 {
    DEFAULT_COOLDOWN_HOURS
}

fn default_references_dir() -> PathBuf {
    PathBuf::from("references")
}

fn default_strip_shortcodes() -> bool {
    true
}

fn default_rewrite_links() -> bool {
    true
}

impl Default for SyncManifest {
    fn default() -> Self {
        Self {
            cooldown_hours: DEFAULT_COOLDOWN_HOURS,
            references_dir: default_references_dir(),
            strip_shortcodes: true,
            rewrite_links: true,
            index_file: None,
            sources: Vec::new(),
        }
    }
}

impl SyncManifest {
    /// Load and validate a manifest (TOML, JSON or YAML by extension).
    pub fn load(path: &Path) -> Result<Self> {
        let manifest: Self = ConfigStore::new().load(path)?;
        manifest.validate().map_err(|message| Error::InvalidManifest {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(manifest)
    }

    /// Check that every local path stays inside the working directory and
    /// that no two sources write the same file.
    pub fn validate(&self) -> std::result::Result<(), String> {
        check_relative("references_dir", &self.references_dir)?;
        if let Some(index) = &self.index_file {
            check_relative("index_file", index)?;
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            check_relative("source path", &source.path)?;
            if source.url.trim().is_empty() {
                return Err(format!("source {} has an empty url", source.path.display()));
            }
            if !seen.insert(normalize(&source.path)) {
                return Err(format!("duplicate source path {}", source.path.display()));
            }
        }
        Ok(())
    }
}

/// `path` without `.` components, so `./a.md` and `a.md` compare equal.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn check_relative(what: &str, path: &Path) -> std::result::Result<(), String> {
    if path.as_os_str().is_empty() {
        return Err(format!("{what} is empty"));
    }
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(format!(
                    "{what} {} must be relative and stay inside the working directory",
                    path.display()
                ));
            }
        }
    }
    Ok(())
}
