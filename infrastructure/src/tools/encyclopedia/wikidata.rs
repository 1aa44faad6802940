//! `wikidata_search`

use async_trait::async_trait;
use scout_application::{Adapter, AdapterContext};
use scout_domain::{Failure, Item, ItemList, Payload, ToolCall, ToolDefinition};

use crate::tools::common::{query_parameter, required};
use crate::tools::normalize::{array_at, parse_json};

pub const WIKIDATA_SEARCH: &str = "wikidata_search";

const API_URL: &str = "https://www.wikidata.org/w/api.php";

/// Entity search (labels and aliases) over Wikidata.
pub struct WikidataSearch;

#[async_trait]
impl Adapter for WikidataSearch {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            WIKIDATA_SEARCH,
            "Search Wikidata for entities. Returns Q-identifiers, labels and short descriptions.",
        )
        .with_parameter(query_parameter("Entity name or alias"))
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let query = required(call, "query")?;
        let limits = ctx.limits();

        let request = ctx
            .request(API_URL)
            .query("action", "wbsearchentities")
            .query("search", query)
            .query("language", "en")
            .query("format", "json")
            .query("limit", limits.max_items);
        let data = parse_json(&ctx.fetch(request).await?)?;

        let items = array_at(&data, "/search")
            .iter()
            .filter_map(|entity| {
                let id = entity["id"].as_str()?;
                Some(
                    Item::new()
                        .with("id", id)
                        .with_nonempty("label", entity["label"].as_str())
                        .with_text(
                            "description",
                            limits.snippet(entity["description"].as_str().unwrap_or_default()),
                        )
                        .with_nonempty("url", entity["concepturi"].as_str()),
                )
            })
            .collect();

        Ok(ItemList::bounded(items, limits.max_items).into())
    }
}
