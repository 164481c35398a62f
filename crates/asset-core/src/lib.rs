//! Core layer of the asset pipeline
//!
//! This crate implements the pipeline stages on top of `asset-fs`:
//!
//! - **Scanning**: discover asset units (directories holding a marker file)
//! - **Installation**: expose each unit under a target root as a symlink,
//!   idempotently and without ever overwriting objects it does not own
//! - **Documentation sync**: fetch external reference pages into a local tree,
//!   gated by a persisted cooldown lock
//! - **Render validation**: round-trip markdown through a remote renderer
//!
//! # Architecture
//!
//! ```text
//!                 asset-cli
//!                     |
//!        asset-core ------ asset-remote
//!                     |
//!                 asset-fs
//! ```
//!
//! Network access and time are injected through the [`Fetcher`], [`Renderer`]
//! and [`Clock`] traits; `asset-remote` provides the HTTP implementations.

pub mod error;
pub mod install;
pub mod render;
pub mod scan;
pub mod sync;

pub use error::{Error, Result};
pub use install::{
    InstallOptions, InstallReport, LinkBackend, LinkInstaller, LinkMapping, LinkState,
    SymlinkBackend, UnitOutcome, UnitReport,
};
pub use render::{
    Credential, RenderError, RenderInput, RenderRequest, RenderResult, RenderValidator, Renderer,
    TOKEN_ENV,
};
pub use scan::{AssetScanner, AssetUnit, DEFAULT_MARKER, ScanReport, ScanWarning};
pub use sync::{
    ChangeKind, Clock, DiffStat, DocSyncer, FetchError, Fetcher, FileChange, FixedClock,
    LockStore, RunStatus, SyncLock, SyncManifest, SyncOptions, SyncOutcome, SyncReport,
    SyncSource, SystemClock,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn error_scan_root_displays_path() {
        let error = Error::ScanRoot {
            path: PathBuf::from("/path/to/skills"),
            reason: "not a directory".to_string(),
        };

        let display = format!("{}", error);
        assert!(
            display.contains("/path/to/skills"),
            "Error display should contain the path, got: {}",
            display
        );
        assert!(display.contains("not a directory"));
    }
}
