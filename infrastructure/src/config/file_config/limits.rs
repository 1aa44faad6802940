//! Size cap configuration from TOML (`[limits]` section)

use scout_domain::{ConfigIssue, ConfigIssueCode, Limits, Severity};
use serde::{Deserialize, Serialize};

/// Size caps from TOML.
///
/// # Example
///
/// ```toml
/// [limits]
/// max_items = 5
/// max_content_length = 4000
/// max_snippet_length = 300
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLimitsConfig {
    /// Maximum items returned by list endpoints.
    pub max_items: usize,
    /// Maximum characters of long text (articles, pages, readmes).
    pub max_content_length: usize,
    /// Maximum characters of short per-item text (snippets, abstracts).
    pub max_snippet_length: usize,
}

impl Default for FileLimitsConfig {
    fn default() -> Self {
        let limits = Limits::default();
        Self {
            max_items: limits.max_items,
            max_content_length: limits.max_content_length,
            max_snippet_length: limits.max_snippet_length,
        }
    }
}

/// Values above these still work but flood the agent's context.
const LARGE_MAX_ITEMS: usize = 100;
const LARGE_CONTENT_LENGTH: usize = 100_000;

impl FileLimitsConfig {
    /// Convert to domain `Limits`, returning validation issues.
    ///
    /// A zero cap is an error; the default for that field is substituted so
    /// the returned value is always usable.
    pub fn to_limits(&self) -> (Limits, Vec<ConfigIssue>) {
        let defaults = Limits::default();
        let mut issues = Vec::new();

        let mut pick = |field: &str, value: usize, default: usize, large: usize| -> usize {
            if value == 0 {
                issues.push(ConfigIssue {
                    severity: Severity::Error,
                    code: ConfigIssueCode::ZeroValue {
                        field: format!("limits.{}", field),
                    },
                    message: format!("limits.{} must be at least 1", field),
                });
                return default;
            }
            if value > large {
                issues.push(ConfigIssue {
                    severity: Severity::Warning,
                    code: ConfigIssueCode::LargeValue {
                        field: format!("limits.{}", field),
                        value: value as u64,
                    },
                    message: format!(
                        "limits.{} = {} is unusually large and may flood the agent's context",
                        field, value
                    ),
                });
            }
            value
        };

        let limits = Limits::new(
            pick("max_items", self.max_items, defaults.max_items, LARGE_MAX_ITEMS),
            pick(
                "max_content_length",
                self.max_content_length,
                defaults.max_content_length,
                LARGE_CONTENT_LENGTH,
            ),
            pick(
                "max_snippet_length",
                self.max_snippet_length,
                defaults.max_snippet_length,
                LARGE_CONTENT_LENGTH,
            ),
        );
        (limits, issues)
    }
}
