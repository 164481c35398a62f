//! Source fetching

use std::time::Duration;

use asset_core::{FetchError, Fetcher};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::debug;

use crate::Result;

/// Fetches `http(s)://` URLs over HTTP and reads `file://` URLs from disk.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("asset-pipeline/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, timeout })
    }

    fn fetch_http(&self, url: &str) -> std::result::Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| transport_error(e, self.timeout))?;

        let status = response.status();
        debug!(url, status = status.as_u16(), "Fetched");
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }
        response
            .text()
            .map_err(|e| transport_error(e, self.timeout))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        let parsed =
            reqwest::Url::parse(url).map_err(|e| FetchError::Transport(format!("{url}: {e}")))?;

        match parsed.scheme() {
            "http" | "https" => self.fetch_http(url),
            "file" => {
                let path = parsed
                    .to_file_path()
                    .map_err(|_| FetchError::Transport(format!("{url}: not a local path")))?;
                std::fs::read_to_string(&path).map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => FetchError::NotFound(url.to_string()),
                    _ => FetchError::Transport(format!("{}: {e}", path.display())),
                })
            }
            other => Err(FetchError::Transport(format!(
                "{url}: unsupported scheme '{other}'"
            ))),
        }
    }
}

fn transport_error(error: reqwest::Error, timeout: Duration) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            seconds: timeout.as_secs(),
        }
    } else {
        FetchError::Transport(error.to_string())
    }
}
