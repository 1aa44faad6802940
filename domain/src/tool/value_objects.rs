//! Tool domain value objects: the result envelope and its failure taxonomy
//!
//! Every adapter call ends in exactly one [`ToolResult`] whose [`Outcome`] is
//! either a [`Payload`] or a [`Failure`]. Serialized, the envelope carries a
//! `payload` key or an `error` key, never both:
//!
//! ```json
//! {"tool_name": "wikipedia_search", "payload": {"kind": "items", "value": {...}}, "metadata": {...}}
//! {"tool_name": "github_repo", "error": {"kind": "not_found", "message": "..."}, "metadata": {...}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::bounds::{BoundedText, bound_items};

/// Category of a failed call.
///
/// | Kind | Retryable? | Meaning |
/// |------|-----------|---------|
/// | `timeout` | Yes | No complete response within the fixed duration |
/// | `connection_error` | Yes | DNS, TLS, refused or reset connection |
/// | `http_error` | No | Non-success status not covered by another kind |
/// | `parse_error` | No | Response body did not have the expected shape |
/// | `not_found` | No | The identifier named by the caller does not exist |
/// | `rate_limited` | Yes | Upstream refused the request for quota reasons |
/// | `invalid_argument` | No | Arguments rejected before any request was made |
/// | `unknown_tool` | No | No adapter registered under the requested name |
/// | `cancelled` | No | The invoking framework aborted the call |
///
/// "Retryable" is a hint for the agent; the adapter layer never retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    ConnectionError,
    HttpError,
    ParseError,
    NotFound,
    RateLimited,
    InvalidArgument,
    UnknownTool,
    Cancelled,
}

impl FailureKind {
    pub fn as_str(&self) -> &str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::ConnectionError => "connection_error",
            FailureKind::HttpError => "http_error",
            FailureKind::ParseError => "parse_error",
            FailureKind::NotFound => "not_found",
            FailureKind::RateLimited => "rate_limited",
            FailureKind::InvalidArgument => "invalid_argument",
            FailureKind::UnknownTool => "unknown_tool",
            FailureKind::Cancelled => "cancelled",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FailureKind::Timeout | FailureKind::ConnectionError | FailureKind::RateLimited
        )
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A failed call, reported as a value rather than raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("[{kind}] {message}")]
pub struct Failure {
    pub kind: FailureKind,
    /// Human-readable description, suitable for showing to the agent
    pub message: String,
    /// Upstream HTTP status, when one was received
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Timeout, message)
    }

    pub fn connection_error(message: impl Into<String>) -> Self {
        Self::new(FailureKind::ConnectionError, message)
    }

    pub fn http_error(status: u16, message: impl Into<String>) -> Self {
        Self::new(FailureKind::HttpError, message).with_status(status)
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(FailureKind::ParseError, message)
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            FailureKind::NotFound,
            format!("Not found: {}", resource.into()),
        )
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(FailureKind::RateLimited, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidArgument, message)
    }

    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::new(
            FailureKind::UnknownTool,
            format!("Unknown tool: {}", name.into()),
        )
    }

    pub fn cancelled(tool_name: impl Into<String>) -> Self {
        Self::new(
            FailureKind::Cancelled,
            format!("Call to '{}' was cancelled", tool_name.into()),
        )
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// One normalized record: an ordered mapping of field name to JSON value.
///
/// Fields the upstream did not supply are simply absent. `with_opt` skips
/// `None`, so a missing field never turns into a failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(Map<String, Value>);

impl Item {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn with_opt<V: Into<Value>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Like `with_opt`, but also skips blank strings.
    pub fn with_nonempty(self, key: impl Into<String>, value: Option<&str>) -> Self {
        let value = value.map(str::trim).filter(|s| !s.is_empty());
        self.with_opt(key, value)
    }

    /// Insert bounded text; adds `<key>_truncated: true` when it was cut.
    pub fn with_text(mut self, key: impl Into<String>, text: BoundedText) -> Self {
        let key = key.into();
        if text.truncated {
            self.0.insert(format!("{}_truncated", key), Value::Bool(true));
        }
        self.0.insert(key, Value::String(text.text));
        self
    }

    /// Insert a nested list; adds `<key>_truncated: true` when it was cut.
    pub fn with_items(mut self, key: impl Into<String>, list: ItemList) -> Self {
        let key = key.into();
        if list.truncated {
            self.0.insert(format!("{}_truncated", key), Value::Bool(true));
        }
        let values = list.items.into_iter().map(Item::into_value).collect();
        self.0.insert(key, Value::Array(values));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// A bounded list of items, in upstream order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemList {
    pub items: Vec<Item>,
    /// True when items were dropped to respect the list cap
    pub truncated: bool,
    /// Total match count, when the upstream reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl ItemList {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Keep the first `max_items` items.
    pub fn bounded(items: Vec<Item>, max_items: usize) -> Self {
        let (items, truncated) = bound_items(items, max_items);
        Self {
            items,
            truncated,
            total: None,
        }
    }

    pub fn with_total(mut self, total: Option<u64>) -> Self {
        self.total = total;
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// What a successful call returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Payload {
    /// A single normalized record
    Item(Item),
    /// A bounded list of records
    Items(ItemList),
    /// A bounded block of text
    Text(BoundedText),
}

impl Payload {
    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Payload::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_items(&self) -> Option<&ItemList> {
        match self {
            Payload::Items(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&BoundedText> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<Item> for Payload {
    fn from(item: Item) -> Self {
        Payload::Item(item)
    }
}

impl From<ItemList> for Payload {
    fn from(list: ItemList) -> Self {
        Payload::Items(list)
    }
}

impl From<BoundedText> for Payload {
    fn from(text: BoundedText) -> Self {
        Payload::Text(text)
    }
}

/// Exactly one of the two arms of a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Payload(Payload),
    Error(Failure),
}

impl From<Result<Payload, Failure>> for Outcome {
    fn from(result: Result<Payload, Failure>) -> Self {
        match result {
            Ok(payload) => Outcome::Payload(payload),
            Err(failure) => Outcome::Error(failure),
        }
    }
}

/// Result of a tool execution: the envelope handed back to the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Payload or error, serialized as a `payload` or `error` key
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Metadata about the execution
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Structured metadata about a tool execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Wall-clock duration of the call in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Number of outbound requests the call made
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests: Option<usize>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, payload: impl Into<Payload>) -> Self {
        Self {
            tool_name: tool_name.into(),
            outcome: Outcome::Payload(payload.into()),
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, failure: Failure) -> Self {
        Self {
            tool_name: tool_name.into(),
            outcome: Outcome::Error(failure),
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn from_result(tool_name: impl Into<String>, result: Result<Payload, Failure>) -> Self {
        Self {
            tool_name: tool_name.into(),
            outcome: result.into(),
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: ToolResultMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_requests(mut self, requests: usize) -> Self {
        self.metadata.requests = Some(requests);
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Payload(_))
    }

    pub fn payload(&self) -> Option<&Payload> {
        match &self.outcome {
            Outcome::Payload(payload) => Some(payload),
            Outcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&Failure> {
        match &self.outcome {
            Outcome::Payload(_) => None,
            Outcome::Error(failure) => Some(failure),
        }
    }

    pub fn into_result(self) -> Result<Payload, Failure> {
        match self.outcome {
            Outcome::Payload(payload) => Ok(payload),
            Outcome::Error(failure) => Err(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::bound_text;
    use serde_json::json;

    #[test]
    fn test_failure_display_and_kind() {
        let err = Failure::not_found("repository rust-lang/nope");
        assert_eq!(err.kind, FailureKind::NotFound);
        assert_eq!(err.to_string(), "[not_found] Not found: repository rust-lang/nope");

        let err = Failure::http_error(503, "Service unavailable");
        assert_eq!(err.status, Some(503));
    }

    #[test]
    fn test_failure_retryable_hint() {
        assert!(Failure::timeout("slow").is_retryable());
        assert!(Failure::connection_error("refused").is_retryable());
        assert!(Failure::rate_limited("429").is_retryable());
        assert!(!Failure::parse_error("bad json").is_retryable());
        assert!(!Failure::not_found("x").is_retryable());
        assert!(!Failure::http_error(500, "boom").is_retryable());
    }

    #[test]
    fn test_failure_serialization() {
        let value = serde_json::to_value(Failure::http_error(500, "boom")).unwrap();
        assert_eq!(
            value,
            json!({"kind": "http_error", "message": "boom", "status": 500})
        );

        let value = serde_json::to_value(Failure::timeout("slow")).unwrap();
        assert!(value.get("status").is_none());
    }

    #[test]
    fn test_item_builders() {
        let item = Item::new()
            .with("title", "Rust")
            .with_opt("year", Some(2015))
            .with_opt::<String>("doi", None)
            .with_nonempty("journal", Some("   "))
            .with_nonempty("publisher", Some(" ACM "));

        assert_eq!(item.get_str("title"), Some("Rust"));
        assert_eq!(item.get("year"), Some(&json!(2015)));
        assert!(!item.contains("doi"));
        assert!(!item.contains("journal"));
        assert_eq!(item.get_str("publisher"), Some("ACM"));
    }

    #[test]
    fn test_item_preserves_insertion_order() {
        let item = Item::new().with("z", 1).with("a", 2).with("m", 3);
        let keys: Vec<&str> = item.keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_item_with_text_marks_truncation() {
        let item = Item::new()
            .with_text("content", bound_text("abcdef", 3))
            .with_text("summary", bound_text("ok", 3));

        assert_eq!(item.get_str("content"), Some("abc"));
        assert_eq!(item.get("content_truncated"), Some(&json!(true)));
        assert!(!item.contains("summary_truncated"));
    }

    #[test]
    fn test_item_with_items() {
        let list = ItemList::bounded(
            vec![Item::new().with("n", 1), Item::new().with("n", 2)],
            1,
        );
        let item = Item::new().with_items("reviews", list);

        assert_eq!(item.get("reviews"), Some(&json!([{"n": 1}])));
        assert_eq!(item.get("reviews_truncated"), Some(&json!(true)));
    }

    #[test]
    fn test_item_list_bounded() {
        let items: Vec<Item> = (0..15).map(|i| Item::new().with("i", i)).collect();
        let list = ItemList::bounded(items, 10).with_total(Some(1234));

        assert_eq!(list.len(), 10);
        assert!(list.truncated);
        assert_eq!(list.total, Some(1234));
        assert_eq!(list.items[0].get("i"), Some(&json!(0)));
        assert_eq!(list.items[9].get("i"), Some(&json!(9)));
    }

    #[test]
    fn test_success_envelope_has_payload_only() {
        let result = ToolResult::success("wikipedia_search", ItemList::empty()).with_duration(12);
        let value = serde_json::to_value(&result).unwrap();

        assert!(value.get("payload").is_some());
        assert!(value.get("error").is_none());
        assert_eq!(value["payload"]["kind"], "items");
        assert_eq!(value["payload"]["value"]["items"], json!([]));
        assert_eq!(value["metadata"]["duration_ms"], 12);
    }

    #[test]
    fn test_failure_envelope_has_error_only() {
        let result = ToolResult::failure("github_repo", Failure::not_found("a/b"));
        let value = serde_json::to_value(&result).unwrap();

        assert!(value.get("payload").is_none());
        assert_eq!(value["error"]["kind"], "not_found");
        assert!(!result.is_success());
        assert!(result.payload().is_none());
        assert_eq!(result.error().unwrap().kind, FailureKind::NotFound);
    }

    #[test]
    fn test_envelope_deserializes_back() {
        let text = r#"{"tool_name":"fetch_url","payload":{"kind":"text","value":{"text":"hi","truncated":false,"original_chars":2}},"metadata":{"requests":1}}"#;
        let result: ToolResult = serde_json::from_str(text).unwrap();

        assert!(result.is_success());
        assert_eq!(result.payload().unwrap().as_text().unwrap().text, "hi");
        assert_eq!(result.metadata.requests, Some(1));
    }

    #[test]
    fn test_from_result() {
        let ok = ToolResult::from_result("t", Ok(Payload::Item(Item::new())));
        assert!(ok.is_success());

        let err = ToolResult::from_result("t", Err(Failure::cancelled("t")));
        assert_eq!(err.into_result().unwrap_err().kind, FailureKind::Cancelled);
    }
}
