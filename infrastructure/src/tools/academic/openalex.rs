//! `openalex_search`

use async_trait::async_trait;
use scout_application::{Adapter, AdapterContext};
use scout_domain::{Failure, Item, ItemList, Payload, ToolCall, ToolDefinition};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::tools::common::{query_parameter, required};
use crate::tools::normalize::{array_at, parse_json, str_at, u64_at};

pub const OPENALEX_SEARCH: &str = "openalex_search";

const API_URL: &str = "https://api.openalex.org/works";
const MAX_AUTHORS: usize = 3;

/// Scholarly works search over OpenAlex.
pub struct OpenAlexSearch;

#[async_trait]
impl Adapter for OpenAlexSearch {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            OPENALEX_SEARCH,
            "Search OpenAlex for academic papers across all disciplines. Returns titles, authors, \
             year, citation counts, DOI, open-access status and abstracts.",
        )
        .with_parameter(query_parameter("Search terms"))
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let query = required(call, "query")?;
        let limits = ctx.limits();

        let mut request = ctx
            .request(API_URL)
            .query("search", query)
            .query("per_page", limits.max_items);
        if let Some(email) = ctx.contact_email() {
            request = request.query("mailto", email);
        }
        let data = parse_json(&ctx.fetch(request).await?)?;

        let items = array_at(&data, "/results")
            .iter()
            .map(|work| {
                let authors: Vec<&str> = array_at(work, "/authorships")
                    .iter()
                    .filter_map(|a| str_at(a, "/author/display_name"))
                    .take(MAX_AUTHORS)
                    .collect();

                let mut item = Item::new()
                    .with("title", work["title"].as_str().unwrap_or_default())
                    .with("authors", authors)
                    .with_opt("year", u64_at(work, "/publication_year"))
                    .with("cited_by_count", u64_at(work, "/cited_by_count").unwrap_or(0))
                    .with_nonempty("doi", work["doi"].as_str())
                    .with(
                        "open_access",
                        work.pointer("/open_access/is_oa")
                            .and_then(Value::as_bool)
                            .unwrap_or(false),
                    )
                    .with_nonempty("journal", str_at(work, "/primary_location/source/display_name"))
                    .with_nonempty("pdf_url", str_at(work, "/open_access/oa_url"));

                if let Some(abstract_text) = rebuild_abstract(&work["abstract_inverted_index"]) {
                    item = item.with_text("abstract", limits.snippet(&abstract_text));
                }
                item
            })
            .collect();

        Ok(ItemList::bounded(items, limits.max_items)
            .with_total(u64_at(&data, "/meta/count"))
            .into())
    }
}

/// Rebuild abstract text from OpenAlex's `{word: [positions]}` index.
fn rebuild_abstract(index: &Value) -> Option<String> {
    let index = index.as_object()?;
    let mut words: BTreeMap<u64, &str> = BTreeMap::new();
    for (word, positions) in index {
        for position in positions.as_array().into_iter().flatten() {
            if let Some(position) = position.as_u64() {
                words.insert(position, word);
            }
        }
    }
    if words.is_empty() {
        return None;
    }
    Some(words.into_values().collect::<Vec<_>>().join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{FakeGateway, context};
    use scout_application::AdapterSettings;
    use serde_json::json;

    #[test]
    fn test_rebuild_abstract_orders_by_position() {
        let index = json!({"world": [1], "Hello": [0], "again": [3], "hello": [2]});
        assert_eq!(rebuild_abstract(&index).as_deref(), Some("Hello world hello again"));
        assert_eq!(rebuild_abstract(&json!(null)), None);
        assert_eq!(rebuild_abstract(&json!({})), None);
    }

    #[tokio::test]
    async fn test_search_maps_works() {
        let gateway = FakeGateway::new().route_json(
            API_URL,
            json!({
                "meta": {"count": 1234},
                "results": [{
                    "title": "Attention Is All You Need",
                    "publication_year": 2017,
                    "cited_by_count": 100000,
                    "doi": "https://doi.org/10.48550/arxiv.1706.03762",
                    "authorships": [
                        {"author": {"display_name": "Ashish Vaswani"}},
                        {"author": {"display_name": "Noam Shazeer"}},
                        {"author": {"display_name": "Niki Parmar"}},
                        {"author": {"display_name": "Jakob Uszkoreit"}}
                    ],
                    "open_access": {"is_oa": true, "oa_url": "https://arxiv.org/pdf/1706.03762"},
                    "primary_location": {"source": null},
                    "abstract_inverted_index": {"The": [0], "dominant": [1], "models": [2]}
                }]
            }),
        );
        let settings = AdapterSettings::default().with_contact_email("ops@example.org");
        let ctx = context(&gateway, &settings);
        let call = ToolCall::new(OPENALEX_SEARCH).with_arg("query", "transformers");

        let payload = OpenAlexSearch.run(&ctx, &call).await.unwrap();
        let list = payload.as_items().unwrap();
        assert_eq!(list.total, Some(1234));
        let item = &list.items[0];
        assert_eq!(item.get("authors").unwrap().as_array().unwrap().len(), 3);
        assert_eq!(item.get("year"), Some(&json!(2017)));
        assert_eq!(item.get("open_access"), Some(&json!(true)));
        assert_eq!(item.get_str("pdf_url"), Some("https://arxiv.org/pdf/1706.03762"));
        assert!(!item.contains("journal"));
        assert_eq!(item.get_str("abstract"), Some("The dominant models"));

        let request = gateway.last_request().unwrap();
        assert_eq!(request.query_value("mailto"), Some("ops@example.org"));
        assert_eq!(request.query_value("per_page"), Some("10"));
    }
}
