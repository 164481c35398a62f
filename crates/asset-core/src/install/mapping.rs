//! Link mapping value types

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::scan::AssetUnit;

/// Intended correspondence between one unit and its installed location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkMapping {
    /// Unit name, also the final segment of `target`
    pub name: String,
    /// The unit's absolute root path
    pub source: PathBuf,
    /// Where the link lives
    pub target: PathBuf,
}

impl LinkMapping {
    pub fn for_unit(unit: &AssetUnit, target_root: &Path) -> Self {
        Self {
            name: unit.name.clone(),
            source: unit.root_path.clone(),
            target: target_root.join(&unit.name),
        }
    }
}

/// What was found at a mapping's target before acting on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum LinkState {
    Absent,
    CorrectLink,
    /// A link pointing somewhere other than the source
    WrongLink { current: PathBuf },
    OccupiedByRealFile,
    OccupiedByRealDirectory,
}

impl LinkState {
    /// States that must never be modified automatically.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::OccupiedByRealFile | Self::OccupiedByRealDirectory
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::CorrectLink => "correct-link",
            Self::WrongLink { .. } => "wrong-link",
            Self::OccupiedByRealFile => "occupied-by-real-file",
            Self::OccupiedByRealDirectory => "occupied-by-real-directory",
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_targets_unit_name_under_root() {
        let unit = AssetUnit::new("/repo/plugins/gitlab/skills/gitlab-skill", "SKILL.md");
        let mapping = LinkMapping::for_unit(&unit, Path::new("/home/u/.claude/skills"));

        assert_eq!(mapping.name, "gitlab-skill");
        assert_eq!(
            mapping.target,
            PathBuf::from("/home/u/.claude/skills/gitlab-skill")
        );
        assert_eq!(mapping.source, unit.root_path);
    }

    #[test]
    fn only_real_objects_are_conflicts() {
        assert!(LinkState::OccupiedByRealFile.is_conflict());
        assert!(LinkState::OccupiedByRealDirectory.is_conflict());
        assert!(!LinkState::Absent.is_conflict());
        assert!(!LinkState::CorrectLink.is_conflict());
        assert!(
            !LinkState::WrongLink {
                current: PathBuf::from("/elsewhere")
            }
            .is_conflict()
        );
    }
}
