//! Adapter settings: size caps, the fixed request timeout and the identifying
//! user agent shared by every adapter call.

use scout_domain::Limits;
use std::time::Duration;

/// Fixed per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Identifying `User-Agent` sent with every outbound request.
pub const DEFAULT_USER_AGENT: &str = concat!("source-scout/", env!("CARGO_PKG_VERSION"));

/// Process-wide adapter settings.
///
/// | Field | Default | Used by |
/// |-------|---------|---------|
/// | `limits` | 10 items / 8000 / 500 chars | every adapter |
/// | `timeout` | 30 s | gateway, registry |
/// | `user_agent` | `source-scout/<version>` | gateway |
/// | `contact_email` | none | polite-pool sources (OpenAlex, Crossref) |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterSettings {
    pub limits: Limits,
    pub timeout: Duration,
    pub user_agent: String,
    pub contact_email: Option<String>,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            contact_email: None,
        }
    }
}

impl AdapterSettings {
    // ==================== Builder Methods ====================

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_contact_email(mut self, email: impl Into<String>) -> Self {
        self.contact_email = Some(email.into());
        self
    }

    /// The `User-Agent` header value, with the contact address appended as
    /// `(mailto:...)` when one is configured.
    pub fn effective_user_agent(&self) -> String {
        match &self.contact_email {
            Some(email) => format!("{} (mailto:{})", self.user_agent, email),
            None => self.user_agent.clone(),
        }
    }
}
