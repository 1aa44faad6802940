//! `duckduckgo_instant`

use async_trait::async_trait;
use scout_application::{Adapter, AdapterContext};
use scout_domain::{Failure, Item, ItemList, Payload, ToolCall, ToolDefinition, bound_text};

use crate::tools::common::{query_parameter, required};
use crate::tools::normalize::{array_at, parse_json, str_at};

pub const DUCKDUCKGO_INSTANT: &str = "duckduckgo_instant";

const API_URL: &str = "https://api.duckduckgo.com/";

/// Related-topic text is a one-line teaser, shorter than a snippet.
const TOPIC_TEXT_LENGTH: usize = 200;

const NO_ANSWER_NOTE: &str =
    "No instant answer available. Try wikipedia_search or fetch_url for more detailed results.";

/// DuckDuckGo Instant Answer lookup.
pub struct DuckDuckGoInstant;

#[async_trait]
impl Adapter for DuckDuckGoInstant {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            DUCKDUCKGO_INSTANT,
            "Quick facts from DuckDuckGo Instant Answers: abstract, direct answer, definition \
             and related topics.",
        )
        .with_parameter(query_parameter("Question or topic"))
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let query = required(call, "query")?;
        let limits = ctx.limits();

        let request = ctx
            .request(API_URL)
            .query("q", query)
            .query("format", "json")
            .query("no_html", 1)
            .query("skip_disambig", 1);
        let data = parse_json(&ctx.fetch(request).await?)?;

        let mut item = Item::new().with("query", query);

        if let Some(abstract_text) = str_at(&data, "/Abstract").filter(|s| !s.is_empty()) {
            item = item
                .with_text("abstract", limits.snippet(abstract_text))
                .with_nonempty("abstract_source", str_at(&data, "/AbstractSource"))
                .with_nonempty("abstract_url", str_at(&data, "/AbstractURL"));
        }
        item = item.with_nonempty("answer", str_at(&data, "/Answer"));
        if let Some(definition) = str_at(&data, "/Definition").filter(|s| !s.is_empty()) {
            item = item
                .with_text("definition", limits.snippet(definition))
                .with_nonempty("definition_source", str_at(&data, "/DefinitionSource"));
        }

        // Category groups carry "Topics" instead of "Text"; only leaf topics count
        let topics: Vec<Item> = array_at(&data, "/RelatedTopics")
            .iter()
            .filter_map(|topic| {
                let text = topic["Text"].as_str().filter(|s| !s.is_empty())?;
                Some(
                    Item::new()
                        .with_text("text", bound_text(text, TOPIC_TEXT_LENGTH))
                        .with_nonempty("url", topic["FirstURL"].as_str()),
                )
            })
            .collect();
        if !topics.is_empty() {
            item = item.with_items("related_topics", ItemList::bounded(topics, limits.max_items));
        }

        if item.len() == 1 {
            item = item.with("note", NO_ANSWER_NOTE);
        }
        Ok(item.into())
    }
}
