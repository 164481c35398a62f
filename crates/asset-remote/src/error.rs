//! Error types for asset-remote

/// Result type for client construction
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a client.
///
/// Request-level failures are reported through
/// [`FetchError`](asset_core::FetchError) and
/// [`RenderError`](asset_core::RenderError) instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },
}
