//! The link installer

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::backend::{LinkBackend, SymlinkBackend};
use super::mapping::{LinkMapping, LinkState};
use super::report::{InstallReport, UnitOutcome, UnitReport};
use crate::Result;
use crate::scan::AssetUnit;

/// Options for an install pass
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Inspect and report without touching the filesystem
    pub dry_run: bool,
}

/// Installs units as links under a target root.
///
/// Running the installer again over an unchanged filesystem is a no-op that
/// reports every unit as already installed. Objects it does not own (real
/// files and directories) are never modified.
#[derive(Debug, Clone, Default)]
pub struct LinkInstaller<B = SymlinkBackend> {
    backend: B,
    options: InstallOptions,
}

impl LinkInstaller<SymlinkBackend> {
    pub fn new(options: InstallOptions) -> Self {
        Self::with_backend(SymlinkBackend, options)
    }
}

impl<B: LinkBackend> LinkInstaller<B> {
    pub fn with_backend(backend: B, options: InstallOptions) -> Self {
        Self { backend, options }
    }

    /// Install `units` under `target_root`.
    ///
    /// Each unit is processed independently; a failure or conflict on one unit
    /// does not stop the others.
    ///
    /// # Errors
    ///
    /// Returns an error only if `target_root` cannot be created.
    pub fn install(&self, units: &[AssetUnit], target_root: &Path) -> Result<InstallReport> {
        if !self.options.dry_run {
            std::fs::create_dir_all(target_root)
                .map_err(|e| asset_fs::Error::io(target_root, e))?;
        }

        let mut owners: HashMap<&str, &PathBuf> = HashMap::new();
        let mut report = InstallReport {
            dry_run: self.options.dry_run,
            units: Vec::with_capacity(units.len()),
        };

        for unit in units {
            let mapping = LinkMapping::for_unit(unit, target_root);

            if let Some(owner) = owners.get(unit.name.as_str()) {
                warn!(
                    name = %unit.name,
                    source = %unit.root_path.display(),
                    owner = %owner.display(),
                    "Duplicate unit name; skipping"
                );
                report.units.push(UnitReport {
                    mapping,
                    state: None,
                    outcome: UnitOutcome::DuplicateName {
                        owner: (*owner).clone(),
                    },
                });
                continue;
            }
            owners.insert(unit.name.as_str(), &unit.root_path);

            report.units.push(self.install_one(mapping));
        }

        info!(
            created = report.created(),
            already = report.already_installed(),
            repointed = report.repointed(),
            conflicts = report.conflicts(),
            failures = report.failures(),
            dry_run = report.dry_run,
            "Install pass complete"
        );
        Ok(report)
    }

    fn install_one(&self, mapping: LinkMapping) -> UnitReport {
        let state = match self.backend.inspect(&mapping) {
            Ok(state) => state,
            Err(e) => {
                warn!(target = %mapping.target.display(), error = %e, "Cannot inspect target");
                return UnitReport {
                    mapping,
                    state: None,
                    outcome: UnitOutcome::Failed {
                        message: e.to_string(),
                    },
                };
            }
        };
        debug!(name = %mapping.name, state = %state, "Inspected target");

        let outcome = match &state {
            LinkState::CorrectLink => UnitOutcome::AlreadyInstalled,
            LinkState::OccupiedByRealFile | LinkState::OccupiedByRealDirectory => {
                warn!(
                    target = %mapping.target.display(),
                    state = %state,
                    "Target occupied; manual resolution required"
                );
                UnitOutcome::Conflict
            }
            LinkState::Absent => self.apply(&mapping, UnitOutcome::Created, |b, m| b.create(m)),
            LinkState::WrongLink { current } => self.apply(
                &mapping,
                UnitOutcome::Repointed {
                    previous: current.clone(),
                },
                |b, m| b.repoint(m),
            ),
        };

        UnitReport {
            mapping,
            state: Some(state),
            outcome,
        }
    }

    fn apply(
        &self,
        mapping: &LinkMapping,
        success: UnitOutcome,
        action: impl FnOnce(&B, &LinkMapping) -> asset_fs::Result<()>,
    ) -> UnitOutcome {
        if self.options.dry_run {
            return success;
        }
        match action(&self.backend, mapping) {
            Ok(()) => {
                debug!(name = %mapping.name, target = %mapping.target.display(), "Linked");
                success
            }
            Err(e) => {
                warn!(target = %mapping.target.display(), error = %e, "Link operation failed");
                UnitOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }
}
