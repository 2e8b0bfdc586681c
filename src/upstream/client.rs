//! Upstream API client.
//!
//! # Responsibilities
//! - Build one outbound request per route binding
//! - Attach bearer auth, content type and the correlation id
//! - Enforce connect and total timeouts on every call
//! - Return the upstream status and raw body untouched
//!
//! # Design Decisions
//! - One pooled reqwest client shared by all handlers (cheap to clone)
//! - No retries: a failed call is reported once
//! - Dropping the returned future aborts the in-flight request, so an
//!   inbound disconnect or deadline cancels the upstream call too

use std::time::Duration;

use axum::body::Bytes;
use axum::http::StatusCode;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;
use crate::routing::{RouteBinding, RoutingError};

/// Correlation header forwarded upstream.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Errors that prevent an upstream response from being relayed.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The upstream URL could not be built.
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(#[from] RoutingError),

    /// The call exceeded the configured deadline.
    #[error("upstream timed out after {0} seconds")]
    Timeout(u64),

    /// DNS, connect, TLS or body read failure.
    #[error("upstream transport error: {0}")]
    Transport(#[source] reqwest::Error),
}

impl UpstreamError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::InvalidUrl(_) => "invalid_url",
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::Transport(_) => "transport",
        }
    }
}

/// What came back from the upstream, before any shaping.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Client for the configured upstream base URL.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
    bearer_token: String,
    org_id: String,
    timeout_secs: u64,
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url.as_str())
            .field("org_id", &self.org_id)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

/// Errors constructing the client.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid base URL '{url}': {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

impl UpstreamClient {
    /// Create a client from validated upstream configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, ClientBuildError> {
        let base_url = Url::parse(&config.base_url).map_err(|source| ClientBuildError::BaseUrl {
            url: config.base_url.clone(),
            source,
        })?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("eventbrite-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            bearer_token: config.bearer_token.clone(),
            org_id: config.org_id.clone(),
            timeout_secs: config.request_timeout_secs,
        })
    }

    /// Execute the binding's upstream request exactly once. `event_id` is the
    /// inbound path segment, still percent-encoded.
    pub async fn execute(
        &self,
        binding: &RouteBinding,
        event_id: Option<&str>,
        request_id: Option<&str>,
    ) -> Result<UpstreamReply, UpstreamError> {
        let url = binding.upstream_url(&self.base_url, &self.org_id, event_id)?;

        tracing::debug!(
            operation = %binding.operation,
            method = %binding.upstream_method,
            url = %url,
            "Calling upstream"
        );

        let mut request = self
            .http
            .request(binding.upstream_method.clone(), url)
            .bearer_auth(&self.bearer_token)
            .header(CONTENT_TYPE, "application/json");

        if let Some(id) = request_id {
            request = request.header(X_REQUEST_ID, id);
        }
        if let Some(payload) = binding.payload() {
            request = request.body(payload.clone());
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.classify(e))?;

        Ok(UpstreamReply { status, body })
    }

    fn classify(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.timeout_secs)
        } else {
            UpstreamError::Transport(err)
        }
    }
}
