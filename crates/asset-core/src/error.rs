//! Error types for asset-core

use std::path::PathBuf;

/// Result type for asset-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a whole pipeline stage.
///
/// Per-unit and per-file problems are reported as values inside the stage
/// reports instead; only conditions that make the stage meaningless end up
/// here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The scan root does not exist or is not a directory
    #[error("Cannot scan {path}: {reason}")]
    ScanRoot { path: PathBuf, reason: String },

    /// The sync manifest is structurally invalid
    #[error("Invalid sync manifest {path}: {message}")]
    InvalidManifest { path: PathBuf, message: String },

    /// Another process holds the sync guard
    #[error("Another sync is already running (guard held at {path})")]
    SyncInProgress { path: PathBuf },

    /// Filesystem error from asset-fs
    #[error(transparent)]
    Fs(#[from] asset_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
