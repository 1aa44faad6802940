//! `reddit_search` and `reddit_list`

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat};
use scout_application::{Adapter, AdapterContext};
use scout_domain::{
    BoundedText, Failure, Item, ItemList, Limits, Payload, ToolCall, ToolDefinition,
    ToolParameter,
};
use serde::Deserialize;
use serde_json::Value;

use crate::tools::common::{
    limit_parameter, not_found_on_404, query_parameter, required, typed_args,
};
use crate::tools::normalize::{array_at, parse_json, u64_at};

pub const REDDIT_SEARCH: &str = "reddit_search";
pub const REDDIT_LIST: &str = "reddit_list";

const BASE_URL: &str = "https://www.reddit.com";
const PERMALINK_BASE: &str = "https://reddit.com";

/// Post search, site-wide or within one subreddit.
pub struct RedditSearch;

#[async_trait]
impl Adapter for RedditSearch {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            REDDIT_SEARCH,
            "Search Reddit posts, optionally within one subreddit. Returns titles, scores, \
             comment counts and self-text.",
        )
        .with_parameter(query_parameter("Search terms"))
        .with_parameter(ToolParameter::new(
            "subreddit",
            "Restrict the search to this subreddit (with or without the r/ prefix)",
            false,
        ))
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let query = required(call, "query")?;
        let limits = ctx.limits();

        let request = match call.get_string("subreddit").and_then(normalize_subreddit) {
            Some(subreddit) => ctx
                .request(format!(
                    "{}/r/{}/search.json",
                    BASE_URL,
                    urlencoding::encode(&subreddit)
                ))
                .query("q", query)
                .query("restrict_sr", 1),
            None => ctx
                .request(format!("{}/search.json", BASE_URL))
                .query("q", query),
        }
        .query("limit", limits.max_items);
        let data = parse_json(&ctx.fetch(request).await?)?;

        let items = posts(&data)
            .map(|post| {
                Item::new()
                    .with("title", post["title"].as_str().unwrap_or_default())
                    .with_nonempty("subreddit", post["subreddit"].as_str())
                    .with_opt("url", permalink(post))
                    .with("score", post["score"].as_i64().unwrap_or(0))
                    .with("comments", u64_at(post, "/num_comments").unwrap_or(0))
                    .with_text("selftext", selftext(post, limits))
            })
            .collect();

        Ok(ItemList::bounded(items, limits.max_items).into())
    }
}

/// Listing order for `reddit_list`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Sort {
    #[default]
    Hot,
    New,
    Top,
    Rising,
}

impl Sort {
    fn as_str(self) -> &'static str {
        match self {
            Sort::Hot => "hot",
            Sort::New => "new",
            Sort::Top => "top",
            Sort::Rising => "rising",
        }
    }
}

/// Time window for the `top` listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TimeWindow {
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeWindow {
    fn as_str(self) -> &'static str {
        match self {
            TimeWindow::Hour => "hour",
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::All => "all",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListArgs {
    subreddit: String,
    #[serde(default)]
    sort: Sort,
    #[serde(default)]
    t: TimeWindow,
    #[serde(default)]
    limit: Option<u64>,
}

/// Subreddit listing (hot, new, top, rising).
pub struct RedditList;

#[async_trait]
impl Adapter for RedditList {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            REDDIT_LIST,
            "List posts in a subreddit by sort order (hot, new, top, rising); `t` picks the time \
             window for top.",
        )
        .with_parameter(ToolParameter::new(
            "subreddit",
            "Subreddit name, with or without the r/ prefix",
            true,
        ))
        .with_parameter(
            ToolParameter::new("sort", "Listing order", false)
                .with_choices(&["hot", "new", "top", "rising"])
                .with_default("hot"),
        )
        .with_parameter(
            ToolParameter::new("t", "Time window, used only with sort=top", false)
                .with_choices(&["hour", "day", "week", "month", "year", "all"])
                .with_default("day"),
        )
        .with_parameter(limit_parameter())
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let args: ListArgs = typed_args(call)?;
        let subreddit = normalize_subreddit(&args.subreddit)
            .ok_or_else(|| Failure::invalid_argument("subreddit is required"))?;
        let limits = ctx.limits();
        let limit = limits.clamp_count(args.limit);

        let mut request = ctx
            .request(format!(
                "{}/r/{}/{}.json",
                BASE_URL,
                urlencoding::encode(&subreddit),
                args.sort.as_str()
            ))
            .query("limit", limit);
        if args.sort == Sort::Top {
            request = request.query("t", args.t.as_str());
        }
        let data = ctx
            .fetch(request)
            .await
            .map_err(|e| not_found_on_404(e, format!("subreddit r/{}", subreddit)))?;
        let data = parse_json(&data)?;

        let items = posts(&data)
            .map(|post| {
                Item::new()
                    .with("title", post["title"].as_str().unwrap_or_default())
                    .with("subreddit", post["subreddit"].as_str().unwrap_or(&subreddit))
                    .with_nonempty("author", post["author"].as_str())
                    .with("score", post["score"].as_i64().unwrap_or(0))
                    .with("comments", u64_at(post, "/num_comments").unwrap_or(0))
                    .with_opt("created", post["created_utc"].as_f64().and_then(iso8601))
                    .with_nonempty("url", post["url"].as_str())
                    .with_opt("permalink", permalink(post))
                    .with_text("selftext", selftext(post, limits))
            })
            .collect();

        Ok(ItemList::bounded(items, limit).into())
    }
}

/// Strip an `r/` prefix and slashes; `None` when nothing is left.
fn normalize_subreddit(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let without_prefix = match trimmed.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("r/") => &trimmed[2..],
        _ => trimmed,
    };
    let name = without_prefix.trim_matches('/');
    (!name.is_empty()).then(|| name.to_string())
}

/// `data.children[].data` of a listing response.
fn posts(data: &Value) -> impl Iterator<Item = &Value> {
    array_at(data, "/data/children")
        .iter()
        .map(|child| &child["data"])
        .filter(|post| post.is_object())
}

fn permalink(post: &Value) -> Option<String> {
    post["permalink"]
        .as_str()
        .filter(|p| !p.is_empty())
        .map(|p| format!("{}{}", PERMALINK_BASE, p))
}

fn selftext(post: &Value, limits: &Limits) -> BoundedText {
    limits.snippet(post["selftext"].as_str().unwrap_or_default())
}

/// Unix seconds → `2024-01-31T12:00:00Z`
fn iso8601(seconds: f64) -> Option<String> {
    DateTime::from_timestamp(seconds as i64, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}
