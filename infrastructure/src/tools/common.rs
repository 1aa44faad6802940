//! Argument and failure helpers shared by the adapters.

use scout_domain::{Failure, FailureKind, ToolCall, ToolParameter};
use serde::de::DeserializeOwned;

/// The `query` parameter every search adapter takes.
pub(crate) fn query_parameter(description: &str) -> ToolParameter {
    ToolParameter::new("query", description, true)
}

/// Optional `limit` parameter that can only lower the list cap.
pub(crate) fn limit_parameter() -> ToolParameter {
    ToolParameter::new(
        "limit",
        "Maximum number of results (capped by the configured list limit)",
        false,
    )
    .with_type("integer")
}

/// A required, non-blank string argument.
pub(crate) fn required<'a>(call: &'a ToolCall, key: &str) -> Result<&'a str, Failure> {
    call.require_string(key).map_err(Failure::invalid_argument)
}

/// Deserialize the call's arguments into a typed struct.
pub(crate) fn typed_args<T: DeserializeOwned>(call: &ToolCall) -> Result<T, Failure> {
    call.parse_args().map_err(Failure::invalid_argument)
}

/// Turn a 404 from an identifier lookup into `not_found`.
pub(crate) fn not_found_on_404(failure: Failure, resource: impl Into<String>) -> Failure {
    if failure.kind == FailureKind::HttpError && failure.status == Some(404) {
        Failure::not_found(resource).with_status(404)
    } else {
        failure
    }
}

/// Path segment with spaces as underscores, percent-encoded (wiki titles).
pub(crate) fn title_segment(title: &str) -> String {
    urlencoding::encode(&title.trim().replace(' ', "_")).into_owned()
}
