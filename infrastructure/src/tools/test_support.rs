//! In-memory gateway for adapter tests.

use async_trait::async_trait;
use scout_application::{AdapterContext, AdapterSettings, HttpGateway};
use scout_domain::{Failure, RawResponse, RequestSpec};
use std::sync::Mutex;

/// Canned responses keyed by URL prefix; every request is recorded.
///
/// The longest matching prefix wins. Unmatched URLs fail with
/// `connection_error` so a missing route is obvious in test output.
#[derive(Default)]
pub struct FakeGateway {
    routes: Vec<(String, Result<RawResponse, Failure>)>,
    requests: Mutex<Vec<RequestSpec>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, prefix: impl Into<String>, response: RawResponse) -> Self {
        self.routes.push((prefix.into(), Ok(response)));
        self
    }

    pub fn route_json(self, prefix: impl Into<String>, body: serde_json::Value) -> Self {
        self.route(prefix, RawResponse::json(body.to_string()))
    }

    pub fn route_text(self, prefix: impl Into<String>, content_type: &str, body: &str) -> Self {
        self.route(prefix, RawResponse::new(200, content_type, body))
    }

    pub fn fail(mut self, prefix: impl Into<String>, failure: Failure) -> Self {
        self.routes.push((prefix.into(), Err(failure)));
        self
    }

    /// Route answering with the gateway's own mapping of a non-2xx status.
    pub fn status(self, prefix: impl Into<String>, status: u16) -> Self {
        let failure = if status == 429 {
            Failure::rate_limited("Rate limited (HTTP 429)").with_status(status)
        } else {
            Failure::http_error(status, format!("HTTP error: {}", status))
        };
        self.fail(prefix, failure)
    }

    pub fn requests(&self) -> Vec<RequestSpec> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn last_request(&self) -> Option<RequestSpec> {
        self.requests().pop()
    }
}

#[async_trait]
impl HttpGateway for FakeGateway {
    async fn send(&self, request: &RequestSpec) -> Result<RawResponse, Failure> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        self.routes
            .iter()
            .filter(|(prefix, _)| request.url.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| {
                Err(Failure::connection_error(format!(
                    "no fake route for {}",
                    request.url
                )))
            })
    }
}

/// Default settings used by adapter tests.
pub fn settings() -> AdapterSettings {
    AdapterSettings::default()
}

/// Build a context over `gateway` with default settings.
pub fn context<'a>(gateway: &'a FakeGateway, settings: &'a AdapterSettings) -> AdapterContext<'a> {
    AdapterContext::new(gateway, settings)
}
