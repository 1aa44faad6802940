//! `fetch_url`: fetch one page and return its readable text.

use async_trait::async_trait;
use reqwest::Url;
use scout_application::{Adapter, AdapterContext};
use scout_domain::{Failure, Payload, ToolCall, ToolDefinition, ToolParameter};

use crate::tools::common::required;
use crate::tools::normalize::body_text;

pub const FETCH_URL: &str = "fetch_url";

/// Generic page fetcher.
pub struct FetchUrl;

#[async_trait]
impl Adapter for FetchUrl {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            FETCH_URL,
            "Fetch a web page and return its readable text. HTML is converted to plain text; \
             other text formats are returned as-is.",
        )
        .with_parameter(ToolParameter::new(
            "url",
            "Page URL (http or https; https:// is assumed when no scheme is given)",
            true,
        ))
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let url = normalize_url(required(call, "url")?)?;
        let response = ctx.fetch(ctx.request(url.as_str())).await?;
        let text = body_text(&response)?;
        Ok(ctx.limits().content(&text).into())
    }
}

/// Parse `raw` as an http(s) URL, defaulting the scheme to https.
fn normalize_url(raw: &str) -> Result<Url, Failure> {
    let raw = raw.trim();
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };
    let url = Url::parse(&candidate)
        .map_err(|e| Failure::invalid_argument(format!("Invalid URL '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Failure::invalid_argument(format!(
            "Unsupported URL scheme '{}': only http and https are fetched",
            other
        ))),
    }
}
