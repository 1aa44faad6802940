//! `wikipedia_search` and `wikipedia_article`

use async_trait::async_trait;
use scout_application::{Adapter, AdapterContext};
use scout_domain::{Failure, Item, ItemList, Payload, ToolCall, ToolDefinition, ToolParameter};
use tracing::warn;

use crate::tools::common::{not_found_on_404, query_parameter, required, title_segment};
use crate::tools::normalize::{array_at, parse_json, str_at, strip_tags, u64_at};

pub const WIKIPEDIA_SEARCH: &str = "wikipedia_search";
pub const WIKIPEDIA_ARTICLE: &str = "wikipedia_article";

const API_URL: &str = "https://en.wikipedia.org/w/api.php";
const SUMMARY_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";
const WIKI_URL: &str = "https://en.wikipedia.org/wiki";

/// Full-text search over English Wikipedia.
pub struct WikipediaSearch;

#[async_trait]
impl Adapter for WikipediaSearch {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            WIKIPEDIA_SEARCH,
            "Search Wikipedia for articles matching a query. Returns titles, snippets and URLs; \
             use wikipedia_article to read one.",
        )
        .with_parameter(query_parameter("Search terms"))
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let query = required(call, "query")?;
        let limits = ctx.limits();

        let request = ctx
            .request(API_URL)
            .query("action", "query")
            .query("list", "search")
            .query("srsearch", query)
            .query("format", "json")
            .query("srlimit", limits.max_items);
        let data = parse_json(&ctx.fetch(request).await?)?;

        let items = array_at(&data, "/query/search")
            .iter()
            .filter_map(|hit| {
                let title = hit["title"].as_str()?;
                let snippet = strip_tags(hit["snippet"].as_str().unwrap_or_default());
                Some(
                    Item::new()
                        .with("title", title)
                        .with_text("snippet", limits.snippet(&snippet))
                        .with("url", article_url(title)),
                )
            })
            .collect();

        Ok(ItemList::bounded(items, limits.max_items)
            .with_total(u64_at(&data, "/query/searchinfo/totalhits"))
            .into())
    }
}

/// Summary plus plain-text body of one article.
pub struct WikipediaArticle;

#[async_trait]
impl Adapter for WikipediaArticle {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            WIKIPEDIA_ARTICLE,
            "Get a Wikipedia article by exact title: summary, URL and plain-text content. \
             Use wikipedia_search first to find the title.",
        )
        .with_parameter(ToolParameter::new("title", "Exact article title", true))
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let title = required(call, "title")?;
        let limits = ctx.limits();

        let summary_request = ctx.request(format!("{}/{}", SUMMARY_URL, title_segment(title)));
        let summary = ctx
            .fetch(summary_request)
            .await
            .map_err(|e| not_found_on_404(e, format!("Wikipedia article '{}'", title)))?;
        let summary = parse_json(&summary)?;

        let mut item = Item::new()
            .with("title", str_at(&summary, "/title").unwrap_or(title))
            .with_text(
                "summary",
                limits.snippet(str_at(&summary, "/extract").unwrap_or_default()),
            )
            .with_nonempty("url", str_at(&summary, "/content_urls/desktop/page"));

        // The body is a second request; losing it degrades the result rather
        // than failing the call.
        let content_request = ctx
            .request(API_URL)
            .query("action", "query")
            .query("titles", title.replace(' ', "_"))
            .query("prop", "extracts")
            .query("explaintext", 1)
            .query("format", "json");
        match ctx.fetch(content_request).await.and_then(|r| parse_json(&r)) {
            Ok(data) => {
                if let Some(content) = first_page_extract(&data) {
                    item = item.with_text("content", limits.content(content));
                }
            }
            Err(e) => warn!(title, error = %e, "Wikipedia article body unavailable"),
        }

        Ok(item.into())
    }
}

fn article_url(title: &str) -> String {
    format!("{}/{}", WIKI_URL, title_segment(title))
}

/// `extract` of the first real page (`-1` marks a missing page).
fn first_page_extract(data: &serde_json::Value) -> Option<&str> {
    data.pointer("/query/pages")?
        .as_object()?
        .iter()
        .find(|(id, _)| id.as_str() != "-1")
        .and_then(|(_, page)| page["extract"].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{FakeGateway, context, settings};
    use scout_domain::FailureKind;
    use serde_json::json;

    #[tokio::test]
    async fn test_search_maps_hits() {
        let gateway = FakeGateway::new().route_json(
            API_URL,
            json!({
                "query": {
                    "searchinfo": {"totalhits": 4521},
                    "search": [
                        {"title": "Rust (programming language)", "snippet": "<span class=\"searchmatch\">Rust</span> is a language"},
                        {"title": "Rust", "snippet": "iron oxide"}
                    ]
                }
            }),
        );
        let settings = settings();
        let ctx = context(&gateway, &settings);
        let call = ToolCall::new(WIKIPEDIA_SEARCH).with_arg("query", "rust");

        let payload = WikipediaSearch.run(&ctx, &call).await.unwrap();
        let list = payload.as_items().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.total, Some(4521));
        assert_eq!(list.items[0].get_str("snippet"), Some("Rust is a language"));
        assert_eq!(
            list.items[0].get_str("url"),
            Some("https://en.wikipedia.org/wiki/Rust_%28programming_language%29")
        );

        let request = gateway.last_request().unwrap();
        assert_eq!(request.query_value("srsearch"), Some("rust"));
        assert_eq!(request.query_value("srlimit"), Some("10"));
    }

    #[tokio::test]
    async fn test_search_without_hits_is_empty_list() {
        let gateway = FakeGateway::new().route_json(API_URL, json!({"query": {"search": []}}));
        let settings = settings();
        let ctx = context(&gateway, &settings);
        let call = ToolCall::new(WIKIPEDIA_SEARCH).with_arg("query", "zzzz");

        let payload = WikipediaSearch.run(&ctx, &call).await.unwrap();
        assert!(payload.as_items().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_html_body_is_parse_error() {
        let gateway = FakeGateway::new().route_text(
            API_URL,
            "text/html",
            "<html><body>Wikimedia Error</body></html>",
        );
        let settings = settings();
        let ctx = context(&gateway, &settings);
        let call = ToolCall::new(WIKIPEDIA_SEARCH).with_arg("query", "rust");

        let failure = WikipediaSearch.run(&ctx, &call).await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::ParseError);
    }

    #[tokio::test]
    async fn test_article_combines_summary_and_content() {
        let gateway = FakeGateway::new()
            .route_json(
                SUMMARY_URL,
                json!({
                    "title": "Ada Lovelace",
                    "extract": "English mathematician.",
                    "content_urls": {"desktop": {"page": "https://en.wikipedia.org/wiki/Ada_Lovelace"}}
                }),
            )
            .route_json(
                API_URL,
                json!({"query": {"pages": {"-1": {"missing": ""}, "974": {"extract": "Augusta Ada King..."}}}}),
            );
        let settings = settings();
        let ctx = context(&gateway, &settings);
        let call = ToolCall::new(WIKIPEDIA_ARTICLE).with_arg("title", "Ada Lovelace");

        let payload = WikipediaArticle.run(&ctx, &call).await.unwrap();
        let item = payload.as_item().unwrap();
        assert_eq!(item.get_str("summary"), Some("English mathematician."));
        assert_eq!(item.get_str("content"), Some("Augusta Ada King..."));
        assert_eq!(ctx.requests_made(), 2);
        assert!(gateway.requests()[0].url.ends_with("/Ada_Lovelace"));
    }

    #[tokio::test]
    async fn test_article_content_is_bounded() {
        let long = "x".repeat(9_000);
        let gateway = FakeGateway::new()
            .route_json(SUMMARY_URL, json!({"extract": "s"}))
            .route_json(API_URL, json!({"query": {"pages": {"1": {"extract": long}}}}));
        let settings = settings();
        let ctx = context(&gateway, &settings);
        let call = ToolCall::new(WIKIPEDIA_ARTICLE).with_arg("title", "X");

        let payload = WikipediaArticle.run(&ctx, &call).await.unwrap();
        let item = payload.as_item().unwrap();
        assert_eq!(item.get_str("content").unwrap().chars().count(), 8_000);
        assert_eq!(item.get("content_truncated"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn test_article_missing_is_not_found() {
        let gateway = FakeGateway::new().status(SUMMARY_URL, 404);
        let settings = settings();
        let ctx = context(&gateway, &settings);
        let call = ToolCall::new(WIKIPEDIA_ARTICLE).with_arg("title", "Nonexistent page xyz");

        let failure = WikipediaArticle.run(&ctx, &call).await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::NotFound);
    }

    #[tokio::test]
    async fn test_article_body_failure_degrades() {
        let gateway = FakeGateway::new()
            .route_json(SUMMARY_URL, json!({"extract": "short"}))
            .status(API_URL, 500);
        let settings = settings();
        let ctx = context(&gateway, &settings);
        let call = ToolCall::new(WIKIPEDIA_ARTICLE).with_arg("title", "X");

        let payload = WikipediaArticle.run(&ctx, &call).await.unwrap();
        let item = payload.as_item().unwrap();
        assert_eq!(item.get_str("summary"), Some("short"));
        assert!(!item.contains("content"));
    }
}
