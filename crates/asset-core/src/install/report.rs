//! Install reporting types

use std::path::PathBuf;

use serde::Serialize;

use super::mapping::{LinkMapping, LinkState};

/// What happened to one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum UnitOutcome {
    /// Link created (or would be, in dry-run)
    Created,
    /// Link already pointed at the unit
    AlreadyInstalled,
    /// An existing link was moved to the unit (or would be, in dry-run)
    Repointed { previous: PathBuf },
    /// A real file or directory occupies the target; left untouched
    Conflict,
    /// Another unit earlier in scan order already owns this name
    DuplicateName { owner: PathBuf },
    /// Inspection or link creation failed
    Failed { message: String },
}

impl UnitOutcome {
    /// Whether the unit ended up (or would end up) correctly installed.
    pub fn is_ok(&self) -> bool {
        matches!(
            self,
            Self::Created | Self::AlreadyInstalled | Self::Repointed { .. }
        )
    }
}

/// Per-unit line of an [`InstallReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitReport {
    pub mapping: LinkMapping,
    /// State observed before acting; `None` if it was never inspected
    pub state: Option<LinkState>,
    pub outcome: UnitOutcome,
}

/// Result of one install pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub dry_run: bool,
    pub units: Vec<UnitReport>,
}

impl InstallReport {
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, UnitOutcome::Created))
    }

    pub fn already_installed(&self) -> usize {
        self.count(|o| matches!(o, UnitOutcome::AlreadyInstalled))
    }

    pub fn repointed(&self) -> usize {
        self.count(|o| matches!(o, UnitOutcome::Repointed { .. }))
    }

    /// Conflicts, including duplicate names.
    pub fn conflicts(&self) -> usize {
        self.count(|o| matches!(o, UnitOutcome::Conflict | UnitOutcome::DuplicateName { .. }))
    }

    pub fn failures(&self) -> usize {
        self.count(|o| matches!(o, UnitOutcome::Failed { .. }))
    }

    /// True when every unit is (or would be) correctly installed.
    pub fn is_success(&self) -> bool {
        self.units.iter().all(|u| u.outcome.is_ok())
    }

    fn count(&self, pred: impl Fn(&UnitOutcome) -> bool) -> usize {
        self.units.iter().filter(|u| pred(&u.outcome)).count()
    }
}
