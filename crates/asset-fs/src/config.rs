//! Format-agnostic configuration loading and saving

use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result, io};

/// Format-agnostic configuration store.
///
/// Detects the format from the file extension and handles
/// serialization/deserialization transparently.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    /// Create a new ConfigStore.
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` and `.lock` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = io::read_text(path)?;
        Self::parse(path, &content)
    }

    /// Parse already-read content as if it came from `path`.
    pub fn parse<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T> {
        let parse_err = |format: &str, message: String| Error::ConfigParse {
            path: path.to_path_buf(),
            format: format.into(),
            message,
        };

        match Format::of(path)? {
            Format::Toml => toml::from_str(content).map_err(|e| parse_err("TOML", e.to_string())),
            Format::Json => {
                serde_json::from_str(content).map_err(|e| parse_err("JSON", e.to_string()))
            }
            Format::Yaml => {
                serde_yaml::from_str(content).map_err(|e| parse_err("YAML", e.to_string()))
            }
        }
    }

    /// Save configuration to a file.
    ///
    /// Format is determined from file extension.
    /// Uses atomic write to prevent corruption.
    pub fn save<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let serialize_err = |format: &str, message: String| Error::ConfigSerialize {
            path: path.to_path_buf(),
            format: format.into(),
            message,
        };

        let content = match Format::of(path)? {
            Format::Toml => {
                toml::to_string_pretty(value).map_err(|e| serialize_err("TOML", e.to_string()))?
            }
            Format::Json => serde_json::to_string_pretty(value)
                .map_err(|e| serialize_err("JSON", e.to_string()))?,
            Format::Yaml => {
                serde_yaml::to_string(value).map_err(|e| serialize_err("YAML", e.to_string()))?
            }
        };

        io::write_atomic(path, content.as_bytes())
    }
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" | "lock" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }
}
