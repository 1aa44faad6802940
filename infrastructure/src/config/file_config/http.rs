//! Transport configuration from TOML (`[http]` section)

use scout_application::config::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use scout_domain::{ConfigIssue, ConfigIssueCode, Severity};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transport configuration from TOML.
///
/// # Example
///
/// ```toml
/// [http]
/// timeout_seconds = 20
/// user_agent = "my-agent/2.0"
/// contact_email = "ops@example.org"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Contact address appended to the user agent for polite-pool APIs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
}

impl Default for FileHttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT.as_secs(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            contact_email: None,
        }
    }
}

const LARGE_TIMEOUT_SECONDS: u64 = 300;

impl FileHttpConfig {
    pub fn timeout(&self) -> Duration {
        if self.timeout_seconds == 0 {
            DEFAULT_TIMEOUT
        } else {
            Duration::from_secs(self.timeout_seconds)
        }
    }

    pub fn user_agent(&self) -> &str {
        let trimmed = self.user_agent.trim();
        if trimmed.is_empty() {
            DEFAULT_USER_AGENT
        } else {
            trimmed
        }
    }

    pub fn contact_email(&self) -> Option<&str> {
        self.contact_email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.timeout_seconds == 0 {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                code: ConfigIssueCode::ZeroValue {
                    field: "http.timeout_seconds".to_string(),
                },
                message: "http.timeout_seconds cannot be 0".to_string(),
            });
        } else if self.timeout_seconds > LARGE_TIMEOUT_SECONDS {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::LargeValue {
                    field: "http.timeout_seconds".to_string(),
                    value: self.timeout_seconds,
                },
                message: format!(
                    "http.timeout_seconds = {} is unusually long; a stalled source will hold the agent that long",
                    self.timeout_seconds
                ),
            });
        }

        if self.user_agent.trim().is_empty() {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                code: ConfigIssueCode::EmptyValue {
                    field: "http.user_agent".to_string(),
                },
                message: "http.user_agent cannot be empty".to_string(),
            });
        }

        if let Some(email) = &self.contact_email
            && email.trim().is_empty()
        {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::EmptyValue {
                    field: "http.contact_email".to_string(),
                },
                message: "http.contact_email is empty and will be ignored".to_string(),
            });
        }

        issues
    }
}
