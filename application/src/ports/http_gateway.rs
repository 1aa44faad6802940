//! Transport gateway port
//!
//! The single point where adapters touch the network. One call performs one
//! GET with the request's timeout and the process-wide `User-Agent`, with no
//! retries. Transport problems come back as [`Failure`] values.

use async_trait::async_trait;
use scout_domain::{Failure, RawResponse, RequestSpec};

/// Port for outbound HTTP.
///
/// Implementations map transport errors onto the failure taxonomy:
///
/// | Condition | Failure kind |
/// |-----------|--------------|
/// | deadline exceeded | `timeout` |
/// | DNS / TLS / refused / reset | `connection_error` |
/// | HTTP 429, or 403 with exhausted quota | `rate_limited` |
/// | any other non-2xx | `http_error` with status |
#[async_trait]
pub trait HttpGateway: Send + Sync {
    async fn send(&self, request: &RequestSpec) -> Result<RawResponse, Failure>;
}
