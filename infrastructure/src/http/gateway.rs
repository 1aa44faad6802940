//! `reqwest` implementation of the transport gateway.
//!
//! One [`reqwest::Client`] is built at startup with the identifying
//! `User-Agent` and shared by every adapter call. Each [`RequestSpec`] becomes
//! exactly one GET with its own total timeout; nothing is retried.
//!
//! # Error mapping
//!
//! | reqwest / HTTP | Failure |
//! |----------------|---------|
//! | `is_timeout()` | `timeout` |
//! | `is_builder()` (bad URL) | `invalid_argument` |
//! | connect / request / body errors | `connection_error` |
//! | 429, or 403 with `x-ratelimit-remaining: 0` | `rate_limited` |
//! | other non-2xx | `http_error` (status attached) |
//!
//! Bodies are read chunk by chunk and cut at [`MAX_BODY_SIZE`]; a cut body is
//! returned with `truncated = true` rather than failing the call.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, RETRY_AFTER};
use scout_application::{AdapterSettings, HttpGateway};
use scout_domain::http::Method;
use scout_domain::{Failure, RawResponse, RequestSpec};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

/// Maximum response body size (5 MB)
pub const MAX_BODY_SIZE: usize = 5 * 1024 * 1024;

/// Errors raised while constructing the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Shared HTTP gateway backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestGateway {
    client: reqwest::Client,
    max_body_size: usize,
}

impl ReqwestGateway {
    /// Build the process-wide client from the adapter settings.
    pub fn new(settings: &AdapterSettings) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.effective_user_agent())
            .timeout(settings.timeout)
            .build()?;
        Ok(Self {
            client,
            max_body_size: MAX_BODY_SIZE,
        })
    }

    /// Override the body ceiling.
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    async fn read_body(
        &self,
        response: &mut reqwest::Response,
    ) -> Result<(Vec<u8>, bool), reqwest::Error> {
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let room = self.max_body_size - body.len();
            if chunk.len() > room {
                body.extend_from_slice(&chunk[..room]);
                return Ok((body, true));
            }
            body.extend_from_slice(&chunk);
        }
        Ok((body, false))
    }
}

#[async_trait]
impl HttpGateway for ReqwestGateway {
    async fn send(&self, request: &RequestSpec) -> Result<RawResponse, Failure> {
        let start = Instant::now();
        debug!(method = request.method.as_str(), url = %request.url, "Sending request");

        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
        };
        builder = builder.timeout(request.timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder.send().await.map_err(|e| {
            let failure = transport_failure(&request.url, e);
            warn!(url = %request.url, error = %failure, "Request failed");
            failure
        })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let failure = status_failure(status, response.headers(), &request.url);
            warn!(url = %request.url, status, error = %failure, "Upstream returned an error status");
            return Err(failure);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let (body, truncated) = self.read_body(&mut response).await.map_err(|e| {
            let failure = transport_failure(&request.url, e);
            warn!(url = %request.url, error = %failure, "Failed to read response body");
            failure
        })?;

        debug!(
            url = %request.url,
            status,
            bytes = body.len(),
            truncated,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Received response"
        );

        Ok(RawResponse {
            status,
            content_type,
            body,
            truncated,
        })
    }
}

/// Map a transport-level error to a failure.
fn transport_failure(url: &str, error: reqwest::Error) -> Failure {
    if error.is_timeout() {
        Failure::timeout(format!("Request to {} timed out", url))
    } else if error.is_builder() {
        Failure::invalid_argument(format!("Invalid request for {}: {}", url, error))
    } else if error.is_connect() {
        Failure::connection_error(format!("Could not connect to {}: {}", url, error))
    } else {
        Failure::connection_error(format!("Request to {} failed: {}", url, error))
    }
}

/// Map a non-success status to a failure.
fn status_failure(status: u16, headers: &HeaderMap, url: &str) -> Failure {
    let quota_exhausted = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0");

    if status == 429 || (status == 403 && quota_exhausted) {
        let retry_after = headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(|v| format!(" (retry after {})", v.trim()))
            .unwrap_or_default();
        return Failure::rate_limited(format!(
            "Rate limited by {} (HTTP {}){}",
            url, status, retry_after
        ))
        .with_status(status);
    }

    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown");
    Failure::http_error(status, format!("HTTP error: {} {}", status, reason))
}
