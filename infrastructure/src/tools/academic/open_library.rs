//! `open_library_search`

use async_trait::async_trait;
use scout_application::{Adapter, AdapterContext};
use scout_domain::{Failure, Item, ItemList, Payload, ToolCall, ToolDefinition};

use crate::tools::common::{query_parameter, required};
use crate::tools::normalize::{array_at, parse_json, strings_at, u64_at};

pub const OPEN_LIBRARY_SEARCH: &str = "open_library_search";

const API_URL: &str = "https://openlibrary.org/search.json";
const SITE_URL: &str = "https://openlibrary.org";
const MAX_AUTHORS: usize = 3;
const MAX_SUBJECTS: usize = 5;

/// Book search over Open Library.
pub struct OpenLibrarySearch;

#[async_trait]
impl Adapter for OpenLibrarySearch {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            OPEN_LIBRARY_SEARCH,
            "Search Open Library for books. Returns titles, authors, first publication year \
             and subjects.",
        )
        .with_parameter(query_parameter("Title, author or topic"))
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let query = required(call, "query")?;
        let limits = ctx.limits();

        let request = ctx
            .request(API_URL)
            .query("q", query)
            .query("limit", limits.max_items);
        let data = parse_json(&ctx.fetch(request).await?)?;

        let items = array_at(&data, "/docs")
            .iter()
            .map(|doc| {
                let mut authors = strings_at(doc, "/author_name");
                authors.truncate(MAX_AUTHORS);
                let mut subjects = strings_at(doc, "/subject");
                subjects.truncate(MAX_SUBJECTS);
                Item::new()
                    .with("title", doc["title"].as_str().unwrap_or_default())
                    .with("authors", authors)
                    .with_opt("first_published", u64_at(doc, "/first_publish_year"))
                    .with("subjects", subjects)
                    .with_opt(
                        "url",
                        doc["key"]
                            .as_str()
                            .filter(|k| !k.is_empty())
                            .map(|key| format!("{}{}", SITE_URL, key)),
                    )
            })
            .collect();

        Ok(ItemList::bounded(items, limits.max_items)
            .with_total(u64_at(&data, "/numFound"))
            .into())
    }
}
