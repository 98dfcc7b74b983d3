//! Outbound forwarding of payloads to the downstream target.

use std::error::Error as StdError;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, HeaderValue, StatusCode};
use thiserror::Error;
use url::Url;

use crate::config::RelayConfig;
use crate::relay::payload::Payload;

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid forward url '{url}': {source}")]
    Url {
        url: String,
        source: url::ParseError,
    },

    #[error("POST {url} timed out after {timeout_secs}s")]
    Timeout { url: Url, timeout_secs: u64 },

    #[error("POST {url} failed: {}", chain(.source))]
    Transport { url: Url, source: reqwest::Error },

    #[error("POST {url} returned {status}")]
    Status { url: Url, status: StatusCode },

    #[error("failed to read response from {url}: {}", chain(.source))]
    Body { url: Url, source: reqwest::Error },
}

/// Render an error with all of its causes. reqwest keeps the useful part
/// ("connection refused") in the source chain.
fn chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Where payloads are sent. Fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct ForwardTarget {
    url: Url,
    self_test: bool,
}

impl ForwardTarget {
    /// Use the configured URL, or fall back to this relay's self-test endpoint.
    pub fn from_config(config: &RelayConfig) -> Result<Self, ForwardError> {
        let (raw, self_test) = match &config.forward.url {
            Some(url) => (url.clone(), false),
            None => (config.self_test_url(), true),
        };
        let url = Url::parse(&raw).map_err(|source| ForwardError::Url { url: raw, source })?;
        Ok(Self { url, self_test })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The target URL with `query` appended after any query it already has.
    pub fn url_with_query(&self, query: Option<&str>) -> Url {
        let mut url = self.url.clone();
        match (query.filter(|q| !q.is_empty()), self.url.query()) {
            (Some(extra), Some(existing)) if !existing.is_empty() => {
                url.set_query(Some(&format!("{existing}&{extra}")));
            }
            (Some(extra), _) => url.set_query(Some(extra)),
            (None, _) => {}
        }
        url
    }

    /// True when no forward URL was configured.
    pub fn is_self_test(&self) -> bool {
        self.self_test
    }
}

/// A 2xx answer from the downstream.
#[derive(Debug)]
pub struct ForwardedResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Sends payloads to the [`ForwardTarget`]. Exactly one attempt per call.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    target: ForwardTarget,
    timeout: Duration,
}

impl Forwarder {
    pub fn new(target: ForwardTarget, timeout: Duration) -> Result<Self, ForwardError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("plex-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ForwardError::Client)?;

        Ok(Self {
            client,
            target,
            timeout,
        })
    }

    pub fn target(&self) -> &ForwardTarget {
        &self.target
    }

    /// POST `payload` as JSON. The inbound raw `query` string is appended to
    /// the target URL as-is. Only a 2xx answer counts as delivered.
    pub async fn forward(
        &self,
        payload: &Payload,
        query: Option<&str>,
        request_id: Option<&HeaderValue>,
    ) -> Result<ForwardedResponse, ForwardError> {
        let url = self.target.url_with_query(query);

        let mut request = self.client.post(url).json(payload.as_value());
        if let Some(id) = request_id {
            request = request.header("x-request-id", id.clone());
        }

        let response = request.send().await.map_err(|e| self.classify(e, false))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForwardError::Status {
                url: self.target.url().clone(),
                status,
            });
        }

        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.bytes().await.map_err(|e| self.classify(e, true))?;

        Ok(ForwardedResponse {
            status,
            content_type,
            body,
        })
    }

    fn classify(&self, source: reqwest::Error, reading_body: bool) -> ForwardError {
        let url = self.target.url().clone();
        if source.is_timeout() {
            ForwardError::Timeout {
                url,
                timeout_secs: self.timeout.as_secs(),
            }
        } else if reading_body {
            ForwardError::Body { url, source }
        } else {
            ForwardError::Transport { url, source }
        }
    }
}
