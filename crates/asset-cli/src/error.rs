//! Error types for asset-cli

use asset_core::RenderError;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Exit code for a missing renderer credential
pub const EXIT_MISSING_CREDENTIAL: i32 = 2;

/// Errors that end a CLI invocation
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from asset-core
    #[error(transparent)]
    Core(#[from] asset_core::Error),

    /// Error building a network client
    #[error(transparent)]
    Remote(#[from] asset_remote::Error),

    /// Render validation failed
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON report serialization failed
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Some units were left in conflict or failed
    #[error("install incomplete: {conflicts} conflict(s), {failures} failure(s)")]
    InstallIncomplete { conflicts: usize, failures: usize },

    /// The sync run was recorded as failed
    #[error("sync failed: {failures} source(s) failed{index}")]
    SyncFailed { failures: usize, index: String },

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Render(e) if e.is_missing_credential() => EXIT_MISSING_CREDENTIAL,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_has_distinct_exit_code() {
        let missing = CliError::from(RenderError::MissingCredential {
            variable: "GITLAB_TOKEN".to_string(),
        });
        let transport = CliError::from(RenderError::Transport("refused".to_string()));

        assert_eq!(missing.exit_code(), 2);
        assert_eq!(transport.exit_code(), 1);
        assert_eq!(CliError::user("bad").exit_code(), 1);
    }
}
