//! Render validation
//!
//! Round-trips markdown through a remote renderer to confirm it is accepted.
//! The rendered output is not inspected; a completed round trip is the whole
//! check.

use std::fmt;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

/// Environment variable holding the renderer access token
pub const TOKEN_ENV: &str = "GITLAB_TOKEN";

/// Errors from a render validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// No access token was supplied; no request was made
    #[error("missing credential: set {variable}")]
    MissingCredential { variable: String },

    #[error("cannot read input {path}: {message}")]
    Input { path: PathBuf, message: String },

    #[error("render request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("renderer returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("invalid renderer response: {0}")]
    InvalidResponse(String),

    #[error("cannot write output {path}: {message}")]
    Output { path: PathBuf, message: String },
}

impl RenderError {
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Self::MissingCredential { .. })
    }
}

/// Access token for the renderer. Never printed.
#[derive(Clone)]
pub struct Credential(SecretString);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Wrap a supplied token, failing with [`RenderError::MissingCredential`]
    /// when it is absent or blank.
    pub fn from_token(token: Option<&str>) -> Result<Self, RenderError> {
        token
            .filter(|t| !t.trim().is_empty())
            .map(Self::new)
            .ok_or_else(|| RenderError::MissingCredential {
                variable: TOKEN_ENV.to_string(),
            })
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Where the markdown comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderInput {
    File(PathBuf),
    Inline(String),
}

impl RenderInput {
    pub fn read(&self) -> Result<String, RenderError> {
        match self {
            Self::Inline(text) => Ok(text.clone()),
            Self::File(path) => asset_fs::io::read_text(path).map_err(|e| RenderError::Input {
                path: path.clone(),
                message: e.to_string(),
            }),
        }
    }
}

/// Payload submitted to a [`Renderer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub text: String,
    /// Project path used to resolve relative references
    pub project: Option<String>,
}

/// A remote markdown renderer.
pub trait Renderer {
    fn render(&self, credential: &Credential, request: &RenderRequest)
    -> Result<String, RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn render(
        &self,
        credential: &Credential,
        request: &RenderRequest,
    ) -> Result<String, RenderError> {
        (**self).render(credential, request)
    }
}

/// Outcome of a successful round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    pub rendered_output: String,
    /// Length in bytes of the submitted text
    pub input_len: usize,
}

impl RenderResult {
    /// Write the rendered output atomically to `path`.
    pub fn persist(&self, path: &Path) -> Result<(), RenderError> {
        asset_fs::io::write_text(path, &self.rendered_output).map_err(|e| RenderError::Output {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

pub struct RenderValidator<R> {
    renderer: R,
}

impl<R: Renderer> RenderValidator<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    /// Submit `input` for rendering.
    ///
    /// The credential is checked before the input is read, so a missing
    /// token fails without touching the filesystem or the network.
    pub fn validate(
        &self,
        credential: Option<&Credential>,
        input: &RenderInput,
        project: Option<&str>,
    ) -> Result<RenderResult, RenderError> {
        let credential = credential.ok_or_else(|| RenderError::MissingCredential {
            variable: TOKEN_ENV.to_string(),
        })?;

        let text = input.read()?;
        let request = RenderRequest {
            text,
            project: project.map(str::to_string),
        };
        debug!(bytes = request.text.len(), project = ?request.project, "Submitting markdown");

        let rendered_output = self.renderer.render(credential, &request)?;
        info!(bytes = rendered_output.len(), "Markdown rendered");
        Ok(RenderResult {
            rendered_output,
            input_len: request.text.len(),
        })
    }
}
