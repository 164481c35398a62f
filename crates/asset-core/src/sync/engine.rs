//! DocSyncer implementation
//!
//! A run takes the cross-process guard, reads the lock record fresh, decides
//! whether the cooldown allows a sync, then fetches every manifest source and
//! writes the ones whose content differs from disk. Each file is handled
//! independently: one unreachable page marks the run failed but does not roll
//! back the pages that were written.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use asset_fs::{checksum, io};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::groom::{LinkMap, rewrite_links, strip_shortcodes};
use super::index::{link_prefix, render_index_tree, replace_index_section};
use super::lock::{Clock, LockStore, SyncLock};
use super::manifest::{SyncManifest, SyncSource, normalize};
use crate::Result;

/// Errors a [`Fetcher`] can report for a single URL
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("HTTP {status}")]
    Http { status: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("not found: {0}")]
    NotFound(String),
}

/// Retrieves remote content.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> std::result::Result<String, FetchError>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        (**self).fetch(url)
    }
}

/// Options for a sync run
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Ignore the cooldown
    pub force: bool,
    /// Compute and report the diff without writing files or the lock record
    pub dry_run: bool,
}

/// Line-level size of an update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStat {
    pub insertions: usize,
    pub deletions: usize,
}

impl DiffStat {
    pub fn between(old: &str, new: &str) -> Self {
        let mut stat = Self::default();
        for change in TextDiff::from_lines(old, new).iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => stat.insertions += 1,
                ChangeTag::Delete => stat.deletions += 1,
                ChangeTag::Equal => {}
            }
        }
        stat
    }
}

/// How one source relates to its local file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Updated { diff: DiffStat },
    Unchanged,
    Failed { error: String },
}

/// Per-source line of a [`SyncReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    /// Path relative to the references directory
    pub path: PathBuf,
    pub url: String,
    pub kind: ChangeKind,
}

impl FileChange {
    pub fn is_failed(&self) -> bool {
        matches!(self.kind, ChangeKind::Failed { .. })
    }

    /// Whether this change writes (or would write) the local file.
    pub fn is_write(&self) -> bool {
        matches!(self.kind, ChangeKind::Added | ChangeKind::Updated { .. })
    }
}

/// Overall result of a sync invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SyncOutcome {
    /// Cooldown still active; nothing was fetched
    Skipped {
        #[serde(serialize_with = "serialize_delta")]
        remaining: TimeDelta,
        last_success: DateTime<Utc>,
    },
    Completed,
    Failed,
}

fn serialize_delta<S: serde::Serializer>(
    delta: &TimeDelta,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_i64(delta.num_seconds())
}

/// Report from a sync run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    pub dry_run: bool,
    pub changes: Vec<FileChange>,
    /// Local markdown files no manifest source accounts for (never deleted)
    pub stale: Vec<PathBuf>,
    pub index_updated: bool,
    pub index_error: Option<String>,
}

impl SyncReport {
    fn skipped(remaining: TimeDelta, last_success: DateTime<Utc>, dry_run: bool) -> Self {
        Self {
            outcome: SyncOutcome::Skipped {
                remaining,
                last_success,
            },
            dry_run,
            changes: Vec::new(),
            stale: Vec::new(),
            index_updated: false,
            index_error: None,
        }
    }

    /// Skipped and completed runs are both successes.
    pub fn is_success(&self) -> bool {
        !matches!(self.outcome, SyncOutcome::Failed)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, SyncOutcome::Skipped { .. })
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileChange> {
        self.changes.iter().filter(|c| c.is_failed())
    }

    pub fn writes(&self) -> impl Iterator<Item = &FileChange> {
        self.changes.iter().filter(|c| c.is_write())
    }
}

/// Synchronizes a local reference tree with the sources of a manifest.
pub struct DocSyncer<F, C> {
    working_dir: PathBuf,
    manifest: SyncManifest,
    lock_store: LockStore,
    links: LinkMap,
    fetcher: F,
    clock: C,
}

impl<F: Fetcher, C: Clock> DocSyncer<F, C> {
    pub fn new(working_dir: impl Into<PathBuf>, manifest: SyncManifest, fetcher: F, clock: C) -> Self {
        let working_dir = working_dir.into();
        let lock_store = LockStore::in_dir(&working_dir);
        let links = LinkMap::new(&manifest.sources);
        Self {
            working_dir,
            manifest,
            lock_store,
            links,
            fetcher,
            clock,
        }
    }

    pub fn lock_store(&self) -> &LockStore {
        &self.lock_store
    }

    pub fn references_dir(&self) -> PathBuf {
        self.working_dir.join(&self.manifest.references_dir)
    }

    /// Run one synchronization.
    ///
    /// # Errors
    ///
    /// Returns an error if another sync holds the guard or the lock record
    /// cannot be written. Per-file problems are reported in the
    /// [`SyncReport`] instead.
    pub fn run(&self, options: SyncOptions) -> Result<SyncReport> {
        let _guard = self.lock_store.acquire()?;

        let mut lock = self.lock_store.load(self.manifest.cooldown_hours);
        let now = self.clock.now();

        if !lock.should_run(now, options.force) {
            let remaining = lock.remaining(now).unwrap_or_else(TimeDelta::zero);
            let last_success = lock.last_successful_run.unwrap_or(now);
            info!(remaining_minutes = remaining.num_minutes(), "Cooldown active; skipping sync");
            return Ok(SyncReport::skipped(remaining, last_success, options.dry_run));
        }

        let references = self.references_dir();
        let changes: Vec<FileChange> = self
            .manifest
            .sources
            .iter()
            .map(|source| self.sync_source(source, &references, options.dry_run))
            .collect();

        let stale = self.stale_files(&references);

        let (index_updated, index_error) = match (&self.manifest.index_file, options.dry_run) {
            (Some(index_file), false) => match self.update_index(index_file, &references) {
                Ok(updated) => (updated, None),
                Err(e) => {
                    warn!(error = %e, "Failed to update documentation index");
                    (false, Some(e.to_string()))
                }
            },
            _ => (false, None),
        };

        let failed = changes.iter().any(FileChange::is_failed) || index_error.is_some();

        if !options.dry_run {
            self.record(&mut lock, &changes, !failed)?;
        }

        let report = SyncReport {
            outcome: if failed {
                SyncOutcome::Failed
            } else {
                SyncOutcome::Completed
            },
            dry_run: options.dry_run,
            changes,
            stale,
            index_updated,
            index_error,
        };
        info!(
            writes = report.writes().count(),
            failures = report.failures().count(),
            stale = report.stale.len(),
            dry_run = options.dry_run,
            "Sync finished"
        );
        Ok(report)
    }

    fn record(&self, lock: &mut SyncLock, changes: &[FileChange], success: bool) -> Result<()> {
        lock.record_result(self.clock.now(), success);
        lock.files_processed = changes.iter().filter(|c| !c.is_failed()).count();
        self.lock_store.save(lock)
    }

    fn sync_source(&self, source: &SyncSource, references: &Path, dry_run: bool) -> FileChange {
        let change = |kind| FileChange {
            path: source.path.clone(),
            url: source.url.clone(),
            kind,
        };
        let failed = |error: String| change(ChangeKind::Failed { error });

        let fetched = match self.fetcher.fetch(&source.url) {
            Ok(content) => content,
            Err(e) => {
                warn!(url = %source.url, error = %e, "Fetch failed");
                return failed(e.to_string());
            }
        };
        let content = if self.manifest.strip_shortcodes {
            strip_shortcodes(&fetched)
        } else {
            fetched
        };
        let content = if self.manifest.rewrite_links {
            rewrite_links(&content, &source.url, &source.path, &self.links)
        } else {
            content
        };

        let local = references.join(&source.path);
        let kind = match checksum::checksum_file(&local) {
            Err(e) => return failed(e.to_string()),
            Ok(None) => ChangeKind::Added,
            Ok(Some(sum)) if sum == checksum::checksum_str(&content) => ChangeKind::Unchanged,
            Ok(Some(_)) => {
                let old = match io::read_text(&local) {
                    Ok(old) => old,
                    Err(e) => return failed(e.to_string()),
                };
                ChangeKind::Updated {
                    diff: DiffStat::between(&old, &content),
                }
            }
        };
        debug!(path = %source.path.display(), kind = ?kind, "Compared source");

        if dry_run || matches!(kind, ChangeKind::Unchanged) {
            return change(kind);
        }

        match io::write_text(&local, &content) {
            Ok(()) => change(kind),
            Err(e) => {
                warn!(path = %local.display(), error = %e, "Write failed");
                failed(e.to_string())
            }
        }
    }

    /// Markdown files under the references directory that no source owns.
    fn stale_files(&self, references: &Path) -> Vec<PathBuf> {
        if !references.is_dir() {
            return Vec::new();
        }
        let owned: HashSet<PathBuf> = self
            .manifest
            .sources
            .iter()
            .map(|s| normalize(&s.path))
            .collect();

        markdown_files(references)
            .into_iter()
            .filter(|rel| !owned.contains(rel))
            .collect()
    }

    fn update_index(&self, index_file: &Path, references: &Path) -> Result<bool> {
        let index_path = self.working_dir.join(index_file);
        let content = io::read_text(&index_path)?;

        let files = markdown_files(references);
        let prefix = link_prefix(index_file, &self.manifest.references_dir);
        let tree = render_index_tree(references, &files, &prefix);
        let updated = replace_index_section(&content, &tree);

        if updated == content {
            return Ok(false);
        }
        io::write_text(&index_path, &updated)?;
        debug!(path = %index_path.display(), files = files.len(), "Updated documentation index");
        Ok(true)
    }
}

/// Sorted markdown files below `root`, relative to it. Symlinks are not
/// followed.
fn markdown_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("md"))
        .filter_map(|e| e.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect();
    files.sort();
    files
}
