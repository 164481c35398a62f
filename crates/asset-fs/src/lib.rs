//! Filesystem primitives for the asset pipeline
//!
//! Provides atomic writes, advisory file guards, symlink inspection and
//! creation, content checksums, and format-agnostic config loading.

pub mod checksum;
pub mod config;
pub mod error;
pub mod guard;
pub mod io;
pub mod link;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use guard::FileGuard;
pub use link::EntryKind;
