//! `github_search` and `github_repo`
//!
//! Unauthenticated REST API calls. GitHub signals an exhausted quota with
//! `403` plus `x-ratelimit-remaining: 0`, which the gateway reports as
//! `rate_limited`.

use async_trait::async_trait;
use scout_application::{Adapter, AdapterContext};
use scout_domain::{Failure, Item, ItemList, Payload, ToolCall, ToolDefinition, ToolParameter};
use tracing::debug;

use crate::tools::common::{not_found_on_404, query_parameter, required};
use crate::tools::normalize::{array_at, date_prefix, parse_json, str_at, strings_at, u64_at};

pub const GITHUB_SEARCH: &str = "github_search";
pub const GITHUB_REPO: &str = "github_repo";

const API_URL: &str = "https://api.github.com";
const JSON_ACCEPT: &str = "application/vnd.github+json";
const RAW_ACCEPT: &str = "application/vnd.github.raw";

/// Repository search.
pub struct GitHubSearch;

#[async_trait]
impl Adapter for GitHubSearch {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            GITHUB_SEARCH,
            "Search GitHub repositories. Returns names, descriptions, stars, language and last \
             update; use github_repo for details.",
        )
        .with_parameter(query_parameter("Search terms (GitHub search qualifiers accepted)"))
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let query = required(call, "query")?;
        let limits = ctx.limits();

        let request = ctx
            .request(format!("{}/search/repositories", API_URL))
            .query("q", query)
            .query("per_page", limits.max_items)
            .header("Accept", JSON_ACCEPT);
        let data = parse_json(&ctx.fetch(request).await?)?;

        let items = array_at(&data, "/items")
            .iter()
            .filter_map(|repo| {
                let name = repo["full_name"].as_str()?;
                Some(
                    Item::new()
                        .with("name", name)
                        .with_text(
                            "description",
                            limits.snippet(repo["description"].as_str().unwrap_or_default()),
                        )
                        .with_nonempty("url", repo["html_url"].as_str())
                        .with("stars", u64_at(repo, "/stargazers_count").unwrap_or(0))
                        .with_nonempty("language", repo["language"].as_str())
                        .with_opt("updated", repo["updated_at"].as_str().map(date_prefix)),
                )
            })
            .collect();

        Ok(ItemList::bounded(items, limits.max_items)
            .with_total(u64_at(&data, "/total_count"))
            .into())
    }
}

/// Repository metadata plus its README.
pub struct GitHubRepo;

#[async_trait]
impl Adapter for GitHubRepo {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            GITHUB_REPO,
            "Get details of one GitHub repository: description, stars, forks, topics, license \
             and README text.",
        )
        .with_parameter(ToolParameter::new("owner", "Repository owner (user or organization)", true))
        .with_parameter(ToolParameter::new("repo", "Repository name", true))
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let owner = required(call, "owner")?;
        let repo = required(call, "repo")?;
        let limits = ctx.limits();
        let base = format!(
            "{}/repos/{}/{}",
            API_URL,
            urlencoding::encode(owner),
            urlencoding::encode(repo)
        );

        let request = ctx.request(&base).header("Accept", JSON_ACCEPT);
        let data = ctx
            .fetch(request)
            .await
            .map_err(|e| not_found_on_404(e, format!("GitHub repository {}/{}", owner, repo)))?;
        let data = parse_json(&data)?;

        let mut item = Item::new()
            .with("name", data["full_name"].as_str().unwrap_or_default())
            .with_text(
                "description",
                limits.snippet(data["description"].as_str().unwrap_or_default()),
            )
            .with_nonempty("url", data["html_url"].as_str())
            .with("stars", u64_at(&data, "/stargazers_count").unwrap_or(0))
            .with("forks", u64_at(&data, "/forks_count").unwrap_or(0))
            .with_nonempty("language", data["language"].as_str())
            .with("topics", strings_at(&data, "/topics"))
            .with_opt("created", data["created_at"].as_str().map(date_prefix))
            .with_opt("updated", data["updated_at"].as_str().map(date_prefix))
            .with_nonempty("license", str_at(&data, "/license/name"));

        // A repository without a README is normal; any failure here only
        // drops the field.
        let readme = ctx
            .request(format!("{}/readme", base))
            .header("Accept", RAW_ACCEPT);
        match ctx.fetch(readme).await {
            Ok(response) => {
                let text = response.text();
                if !text.trim().is_empty() {
                    item = item.with_text("readme", limits.content(&text));
                }
            }
            Err(e) => debug!(owner, repo, error = %e, "README unavailable"),
        }

        Ok(item.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{FakeGateway, context, settings};
    use scout_domain::{FailureKind, RawResponse};
    use serde_json::json;

    #[tokio::test]
    async fn test_search_maps_repositories() {
        let gateway = FakeGateway::new().route_json(
            API_URL,
            json!({
                "total_count": 2,
                "items": [
                    {"full_name": "rust-lang/rust", "description": "Empowering everyone",
                     "html_url": "https://github.com/rust-lang/rust", "stargazers_count": 95000,
                     "language": "Rust", "updated_at": "2024-05-01T12:00:00Z"},
                    {"full_name": "someone/empty", "description": null, "language": null}
                ]
            }),
        );
        let settings = settings();
        let ctx = context(&gateway, &settings);
        let call = ToolCall::new(GITHUB_SEARCH).with_arg("query", "rust");

        let payload = GitHubSearch.run(&ctx, &call).await.unwrap();
        let list = payload.as_items().unwrap();
        assert_eq!(list.total, Some(2));
        assert_eq!(list.items[0].get_str("updated"), Some("2024-05-01"));
        assert_eq!(list.items[0].get("stars"), Some(&json!(95000)));
        assert!(!list.items[1].contains("language"));

        let request = gateway.last_request().unwrap();
        assert_eq!(request.url, "https://api.github.com/search/repositories");
        assert_eq!(request.query_value("per_page"), Some("10"));
    }

    #[tokio::test]
    async fn test_repo_with_readme() {
        let gateway = FakeGateway::new()
            .route_json(
                "https://api.github.com/repos/tokio-rs/tokio",
                json!({
                    "full_name": "tokio-rs/tokio",
                    "description": "A runtime for writing reliable asynchronous applications",
                    "html_url": "https://github.com/tokio-rs/tokio",
                    "stargazers_count": 25000,
                    "forks_count": 2300,
                    "language": "Rust",
                    "topics": ["async", "rust"],
                    "created_at": "2016-09-09T00:00:00Z",
                    "updated_at": "2024-05-01T00:00:00Z",
                    "license": {"name": "MIT License"}
                }),
            )
            .route(
                "https://api.github.com/repos/tokio-rs/tokio/readme",
                RawResponse::new(200, "application/vnd.github.raw", "# Tokio\n\nA runtime."),
            );
        let settings = settings();
        let ctx = context(&gateway, &settings);
        let call = ToolCall::new(GITHUB_REPO)
            .with_arg("owner", "tokio-rs")
            .with_arg("repo", "tokio");

        let payload = GitHubRepo.run(&ctx, &call).await.unwrap();
        let item = payload.as_item().unwrap();
        assert_eq!(item.get("forks"), Some(&json!(2300)));
        assert_eq!(item.get("topics"), Some(&json!(["async", "rust"])));
        assert_eq!(item.get_str("license"), Some("MIT License"));
        assert_eq!(item.get_str("created"), Some("2016-09-09"));
        assert_eq!(item.get_str("readme"), Some("# Tokio\n\nA runtime."));

        let requests = gateway.requests();
        assert_eq!(requests.len(), 2);
        assert!(
            requests[1]
                .headers
                .contains(&("Accept".to_string(), RAW_ACCEPT.to_string()))
        );
    }

    #[tokio::test]
    async fn test_repo_readme_failure_is_ignored() {
        let gateway = FakeGateway::new()
            .route_json(
                "https://api.github.com/repos/a/b",
                json!({"full_name": "a/b", "license": null}),
            )
            .status("https://api.github.com/repos/a/b/readme", 404);
        let settings = settings();
        let ctx = context(&gateway, &settings);
        let call = ToolCall::new(GITHUB_REPO).with_arg("owner", "a").with_arg("repo", "b");

        let payload = GitHubRepo.run(&ctx, &call).await.unwrap();
        let item = payload.as_item().unwrap();
        assert!(!item.contains("readme"));
        assert!(!item.contains("license"));
    }

    #[tokio::test]
    async fn test_missing_repo_is_not_found() {
        let gateway = FakeGateway::new().status("https://api.github.com/repos/", 404);
        let settings = settings();
        let ctx = context(&gateway, &settings);
        let call = ToolCall::new(GITHUB_REPO)
            .with_arg("owner", "nobody")
            .with_arg("repo", "nothing");

        let failure = GitHubRepo.run(&ctx, &call).await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::NotFound);
        assert_eq!(ctx.requests_made(), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_passes_through() {
        let gateway = FakeGateway::new().status(API_URL, 429);
        let settings = settings();
        let ctx = context(&gateway, &settings);
        let call = ToolCall::new(GITHUB_SEARCH).with_arg("query", "x");

        let failure = GitHubSearch.run(&ctx, &call).await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::RateLimited);
    }
}
