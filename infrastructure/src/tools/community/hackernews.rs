//! `hackernews_search`

use async_trait::async_trait;
use scout_application::{Adapter, AdapterContext};
use scout_domain::{Failure, Item, ItemList, Payload, ToolCall, ToolDefinition};

use crate::tools::common::{query_parameter, required};
use crate::tools::normalize::{array_at, date_prefix, parse_json, u64_at};

pub const HACKERNEWS_SEARCH: &str = "hackernews_search";

const API_URL: &str = "https://hn.algolia.com/api/v1/search";
const ITEM_URL: &str = "https://news.ycombinator.com/item?id=";

/// Story and comment search over Hacker News (Algolia index).
pub struct HackerNewsSearch;

#[async_trait]
impl Adapter for HackerNewsSearch {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            HACKERNEWS_SEARCH,
            "Search Hacker News stories and discussions. Returns titles, links, points and \
             comment counts.",
        )
        .with_parameter(query_parameter("Search terms"))
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let query = required(call, "query")?;
        let limits = ctx.limits();

        let request = ctx
            .request(API_URL)
            .query("query", query)
            .query("hitsPerPage", limits.max_items);
        let data = parse_json(&ctx.fetch(request).await?)?;

        // Comment hits carry story_title instead of title; hits with neither are dropped
        let items = array_at(&data, "/hits")
            .iter()
            .filter_map(|hit| {
                let title = [&hit["title"], &hit["story_title"]]
                    .into_iter()
                    .filter_map(|v| v.as_str())
                    .find(|t| !t.trim().is_empty())?;
                Some(
                    Item::new()
                        .with("title", title)
                        .with_nonempty("url", hit["url"].as_str())
                        .with_opt(
                            "hn_url",
                            hit["objectID"].as_str().map(|id| format!("{}{}", ITEM_URL, id)),
                        )
                        .with("points", u64_at(hit, "/points").unwrap_or(0))
                        .with("comments", u64_at(hit, "/num_comments").unwrap_or(0))
                        .with_nonempty("author", hit["author"].as_str())
                        .with_opt("date", hit["created_at"].as_str().map(date_prefix)),
                )
            })
            .collect();

        Ok(ItemList::bounded(items, limits.max_items)
            .with_total(u64_at(&data, "/nbHits"))
            .into())
    }
}
