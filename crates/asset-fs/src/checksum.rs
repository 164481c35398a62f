//! SHA-256 checksum utilities
//!
//! A single canonical checksum format (`sha256:<hex>`) used to decide whether
//! fetched content differs from what is already on disk.

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::{Error, Result};

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of raw bytes.
pub fn checksum_bytes(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the SHA-256 checksum of string content.
pub fn checksum_str(content: &str) -> String {
    checksum_bytes(content.as_bytes())
}

/// Compute the checksum of a file, or `None` if it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn checksum_file(path: &Path) -> Result<Option<String>> {
    match std::fs::read(path) {
        Ok(content) => Ok(Some(checksum_bytes(&content))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}
