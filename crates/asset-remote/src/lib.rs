//! Network clients for the asset pipeline
//!
//! Implements the `asset-core` seams over a blocking `reqwest` client:
//!
//! - [`HttpFetcher`]: a [`Fetcher`](asset_core::Fetcher) for `http(s)://` and
//!   `file://` sources
//! - [`GitLabRenderer`]: a [`Renderer`](asset_core::Renderer) backed by the
//!   GitLab markdown API

pub mod error;
pub mod fetch;
pub mod gitlab;

pub use error::{Error, Result};
pub use fetch::HttpFetcher;
pub use gitlab::{DEFAULT_GITLAB_URL, GitLabRenderer};
