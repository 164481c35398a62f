//! GitLab markdown API renderer

use std::time::Duration;

use asset_core::{Credential, RenderError, RenderRequest, Renderer};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Renderer host used when none is configured
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

#[derive(Serialize)]
struct MarkdownBody<'a> {
    text: &'a str,
    gfm: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    project: Option<&'a str>,
}

#[derive(Deserialize)]
struct MarkdownResponse {
    html: Option<String>,
    error: Option<serde_json::Value>,
}

/// Renders GitLab Flavored Markdown through `POST /api/v4/markdown`.
#[derive(Debug, Clone)]
pub struct GitLabRenderer {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl GitLabRenderer {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = reqwest::Url::parse(base_url).map_err(|e| Error::InvalidBaseUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidBaseUrl {
                url: base_url.to_string(),
                message: "expected http or https".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("asset-pipeline/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/api/v4/markdown", base_url.trim_end_matches('/')),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, error: reqwest::Error) -> RenderError {
        if error.is_timeout() {
            RenderError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            RenderError::Transport(error.to_string())
        }
    }
}

impl Renderer for GitLabRenderer {
    fn render(
        &self,
        credential: &Credential,
        request: &RenderRequest,
    ) -> std::result::Result<String, RenderError> {
        let body = MarkdownBody {
            text: &request.text,
            gfm: true,
            project: request.project.as_deref(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(TOKEN_HEADER, credential.expose())
            .json(&body)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().map_err(|e| self.transport_error(e))?;
        debug!(endpoint = %self.endpoint, status = status.as_u16(), bytes = text.len(), "Renderer responded");

        if !status.is_success() {
            return Err(RenderError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: MarkdownResponse = serde_json::from_str(&text)
            .map_err(|e| RenderError::InvalidResponse(format!("not JSON: {e}")))?;
        if let Some(error) = parsed.error {
            let detail = match error {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            return Err(RenderError::InvalidResponse(detail));
        }
        parsed
            .html
            .ok_or_else(|| RenderError::InvalidResponse("response has no 'html' field".to_string()))
    }
}
