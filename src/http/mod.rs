// Shared JSON-over-HTTP plumbing for the remote API clients


use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// A reply that reached the server, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse a successful reply, turning any other status into an error carrying the body
    #[inline]
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        if !self.is_success() {
            return Err(anyhow!("HTTP {}: {}", self.status, self.body.trim()));
        }

        serde_json::from_str(&self.body).with_context(|| {
            format!(
                "Failed to parse response body: {}",
                truncate(&self.body, 200)
            )
        })
    }
}

/// Blocking JSON client with a single global timeout and no retries
#[derive(Debug, Clone)]
pub struct JsonAgent {
    agent: ureq::Agent,
    bearer_token: Option<String>,
}

impl JsonAgent {
    #[inline]
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            bearer_token: None,
        }
    }

    #[inline]
    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token;
        self
    }

    #[inline]
    pub fn get(&self, url: &Url) -> Result<HttpReply> {
        debug!("GET {}", url);

        let mut request = self.agent.get(url.as_str());
        if let Some(token) = &self.bearer_token {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }

        Self::finish(url, request.call())
    }

    #[inline]
    pub fn post_json<B: Serialize>(&self, url: &Url, body: &B) -> Result<HttpReply> {
        debug!("POST {}", url);

        let payload = serde_json::to_string(body).context("Failed to serialize request body")?;
        let mut request = self
            .agent
            .post(url.as_str())
            .header("Content-Type", "application/json");
        if let Some(token) = &self.bearer_token {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }

        Self::finish(url, request.send(&payload))
    }

    #[inline]
    pub fn put_json<B: Serialize>(&self, url: &Url, body: &B) -> Result<HttpReply> {
        debug!("PUT {}", url);

        let payload = serde_json::to_string(body).context("Failed to serialize request body")?;
        let mut request = self
            .agent
            .put(url.as_str())
            .header("Content-Type", "application/json");
        if let Some(token) = &self.bearer_token {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }

        Self::finish(url, request.send(&payload))
    }

    fn finish(
        url: &Url,
        outcome: Result<ureq::http::Response<ureq::Body>, ureq::Error>,
    ) -> Result<HttpReply> {
        let mut response = outcome.map_err(|e| {
            warn!("Transport error for {}: {}", url, e);
            anyhow!("Request to {} failed: {}", url, e)
        })?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .with_context(|| format!("Failed to read response body from {}", url))?;

        if !(200..300).contains(&status) {
            warn!("{} responded with HTTP {}", url, status);
        }

        Ok(HttpReply { status, body })
    }
}

/// Append path segments to a base URL, keeping any path the base already has
#[inline]
pub fn endpoint(base: &Url, path: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| anyhow!("URL cannot be a base: {}", base))?
        .pop_if_empty()
        .extend(path.split('/').filter(|segment| !segment.is_empty()));
    Ok(url)
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => text.get(..index).unwrap_or(text),
        None => text,
    }
}
