//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application settings
//! after validation.

mod http;
mod limits;

pub use http::FileHttpConfig;
pub use limits::FileLimitsConfig;

use scout_application::AdapterSettings;
use scout_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Size caps applied to every adapter result
    pub limits: FileLimitsConfig,
    /// Transport settings
    pub http: FileHttpConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.limits.to_limits().1);
        issues.extend(self.http.validate());
        issues
    }

    /// Build the immutable adapter settings.
    ///
    /// Invalid values are replaced with defaults; call [`validate`](Self::validate)
    /// first to surface them.
    pub fn to_settings(&self) -> AdapterSettings {
        let settings = AdapterSettings::default()
            .with_limits(self.limits.to_limits().0)
            .with_timeout(self.http.timeout())
            .with_user_agent(self.http.user_agent());
        match self.http.contact_email() {
            Some(email) => settings.with_contact_email(email),
            None => settings,
        }
    }
}
