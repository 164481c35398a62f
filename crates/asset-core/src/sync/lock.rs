//! Cooldown lock record
//!
//! [`SyncLock`] is a plain value with pure decision functions; [`LockStore`]
//! owns reading and writing it. The record is read fresh for every run and is
//! the only input to the cooldown decision.

use std::path::{Path, PathBuf};

use asset_fs::{ConfigStore, FileGuard};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result};

/// File name of the lock record inside the working directory
pub const LOCK_FILENAME: &str = ".sync-docs.lock";

/// Cooldown applied when nothing else is configured
pub const DEFAULT_COOLDOWN_HOURS: u32 = 72;

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Outcome of the most recent completed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Failure,
}

/// Durable state describing the last synchronization attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncLock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_successful_run: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run_status: Option<RunStatus>,
    #[serde(default = "default_cooldown_hours")]
    pub cooldown_hours: u32,
    /// When the last attempt (of either status) completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run: Option<DateTime<Utc>>,
    /// Files fetched successfully during the last attempt
    #[serde(default)]
    pub files_processed: usize,
}

fn default_cooldown_hours() -> u32 {
    DEFAULT_COOLDOWN_HOURS
}

impl Default for SyncLock {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_HOURS)
    }
}

impl SyncLock {
    /// A record with no prior runs.
    pub fn new(cooldown_hours: u32) -> Self {
        Self {
            last_successful_run: None,
            last_run_status: None,
            cooldown_hours,
            last_run: None,
            files_processed: 0,
        }
    }

    pub fn cooldown(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.cooldown_hours))
    }

    /// Whether a sync may start at `now`.
    pub fn should_run(&self, now: DateTime<Utc>, force: bool) -> bool {
        if force {
            return true;
        }
        match self.last_successful_run {
            None => true,
            Some(last) => now - last >= self.cooldown(),
        }
    }

    /// Time left until the cooldown expires, or `None` if it already has.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        let last = self.last_successful_run?;
        let remaining = last + self.cooldown() - now;
        (remaining > TimeDelta::zero()).then_some(remaining)
    }

    /// Record a completed attempt.
    ///
    /// Only a success moves `last_successful_run`, so a failure never starts
    /// a new cooldown window.
    pub fn record_result(&mut self, now: DateTime<Utc>, success: bool) {
        self.last_run = Some(now);
        if success {
            self.last_successful_run = Some(now);
            self.last_run_status = Some(RunStatus::Success);
        } else {
            self.last_run_status = Some(RunStatus::Failure);
        }
    }
}

/// Format a wait time as `"{hours}h {minutes}m"`.
pub fn format_remaining(remaining: TimeDelta) -> String {
    let minutes = remaining.num_minutes().max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// On-disk home of a [`SyncLock`].
#[derive(Debug, Clone)]
pub struct LockStore {
    path: PathBuf,
}

impl LockStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store for a sync working directory.
    pub fn in_dir(working_dir: &Path) -> Self {
        Self::new(working_dir.join(LOCK_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sidecar file carrying the cross-process guard.
    pub fn guard_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".guard");
        PathBuf::from(name)
    }

    /// Take the exclusive guard covering a read-decide-write sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SyncInProgress`] if another process holds it.
    pub fn acquire(&self) -> Result<FileGuard> {
        let guard_path = self.guard_path();
        FileGuard::try_acquire(&guard_path).map_err(|e| match e {
            asset_fs::Error::LockHeld { path } => Error::SyncInProgress { path },
            other => Error::Fs(other),
        })
    }

    /// Read the record.
    ///
    /// A missing, unreadable, or corrupt record yields a fresh record: losing
    /// it must never block synchronization. `cooldown_hours` always reflects
    /// the configured value, not the stored one.
    pub fn load(&self, cooldown_hours: u32) -> SyncLock {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No lock record; treating as never run");
            return SyncLock::new(cooldown_hours);
        }

        match ConfigStore::new().load::<SyncLock>(&self.path) {
            Ok(mut lock) => {
                lock.cooldown_hours = cooldown_hours;
                lock
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unreadable lock record"
                );
                SyncLock::new(cooldown_hours)
            }
        }
    }

    /// Persist the record atomically.
    pub fn save(&self, lock: &SyncLock) -> Result<()> {
        ConfigStore::new().save(&self.path, lock)?;
        debug!(path = %self.path.display(), status = ?lock.last_run_status, "Saved lock record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn remaining_is_none_without_success() {
        assert_eq!(SyncLock::default().remaining(at(0)), None);
    }

    #[test]
    fn format_remaining_splits_hours_and_minutes() {
        assert_eq!(format_remaining(TimeDelta::minutes(71 * 60 + 5)), "71h 5m");
        assert_eq!(format_remaining(TimeDelta::seconds(30)), "0h 0m");
    }

    #[test]
    fn guard_path_is_sidecar() {
        let store = LockStore::in_dir(Path::new("/work"));
        assert_eq!(store.guard_path(), PathBuf::from("/work/.sync-docs.lock.guard"));
    }
}
