//! Adapter contract
//!
//! An [`Adapter`] wraps one upstream source: it declares its
//! [`ToolDefinition`] (arguments and safety tag) and turns a validated
//! [`ToolCall`] into a [`Payload`] or a [`Failure`].
//!
//! Adapters never hold a client themselves; they reach the network through
//! the [`AdapterContext`] they are given, which also carries the size caps and
//! counts how many requests the call made.

use crate::config::AdapterSettings;
use crate::ports::http_gateway::HttpGateway;
use async_trait::async_trait;
use scout_domain::{
    Failure, Limits, Payload, RawResponse, RequestSpec, ToolCall, ToolDefinition,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// One external knowledge source exposed as a tool.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Static description of the tool. Called once at registration.
    fn definition(&self) -> ToolDefinition;

    /// Execute a call whose arguments already passed validation.
    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure>;
}

/// Per-call view of the shared gateway and settings.
pub struct AdapterContext<'a> {
    gateway: &'a dyn HttpGateway,
    settings: &'a AdapterSettings,
    requests: AtomicUsize,
}

impl<'a> AdapterContext<'a> {
    pub fn new(gateway: &'a dyn HttpGateway, settings: &'a AdapterSettings) -> Self {
        Self {
            gateway,
            settings,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.settings.limits
    }

    pub fn timeout(&self) -> Duration {
        self.settings.timeout
    }

    pub fn contact_email(&self) -> Option<&str> {
        self.settings.contact_email.as_deref()
    }

    /// Start a GET request carrying the configured timeout.
    pub fn request(&self, url: impl Into<String>) -> RequestSpec {
        RequestSpec::get(url, self.settings.timeout)
    }

    /// Send one request through the gateway.
    pub async fn fetch(&self, request: RequestSpec) -> Result<RawResponse, Failure> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.gateway.send(&request).await
    }

    /// Number of requests sent so far in this call.
    pub fn requests_made(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }
}
