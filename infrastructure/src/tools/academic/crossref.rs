//! `crossref_search`

use async_trait::async_trait;
use scout_application::{Adapter, AdapterContext};
use scout_domain::{Failure, Item, ItemList, Payload, ToolCall, ToolDefinition};
use serde_json::Value;

use crate::tools::common::{query_parameter, required};
use crate::tools::normalize::{array_at, parse_json, str_at, u64_at};

pub const CROSSREF_SEARCH: &str = "crossref_search";

const API_URL: &str = "https://api.crossref.org/works";
const MAX_AUTHORS: usize = 5;

/// DOI metadata search over Crossref.
pub struct CrossrefSearch;

#[async_trait]
impl Adapter for CrossrefSearch {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            CROSSREF_SEARCH,
            "Search Crossref for bibliographic metadata: DOIs, titles, authors, journals, \
             publication year and citation counts.",
        )
        .with_parameter(query_parameter("Title, author or free-text bibliographic query"))
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let query = required(call, "query")?;
        let limits = ctx.limits();

        let mut request = ctx
            .request(API_URL)
            .query("query", query)
            .query("rows", limits.max_items);
        if let Some(email) = ctx.contact_email() {
            request = request.query("mailto", email);
        }
        let data = parse_json(&ctx.fetch(request).await?)?;

        let items = array_at(&data, "/message/items")
            .iter()
            .map(|work| {
                let doi = work["DOI"].as_str().filter(|d| !d.is_empty());
                Item::new()
                    .with("title", str_at(work, "/title/0").unwrap_or_default())
                    .with("authors", author_names(work))
                    .with_nonempty("journal", str_at(work, "/container-title/0"))
                    .with_opt("year", publication_year(work))
                    .with_opt("doi", doi)
                    .with_opt("doi_url", doi.map(|d| format!("https://doi.org/{}", d)))
                    .with_nonempty("type", work["type"].as_str())
                    .with(
                        "cited_by_count",
                        u64_at(work, "/is-referenced-by-count").unwrap_or(0),
                    )
            })
            .collect();

        Ok(ItemList::bounded(items, limits.max_items)
            .with_total(u64_at(&data, "/message/total-results"))
            .into())
    }
}

fn author_names(work: &Value) -> Vec<String> {
    array_at(work, "/author")
        .iter()
        .take(MAX_AUTHORS)
        .filter_map(|author| {
            let parts: Vec<&str> = ["given", "family"]
                .iter()
                .filter_map(|key| author[*key].as_str())
                .filter(|s| !s.is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        })
        .collect()
}

/// Print date when present, online date otherwise.
fn publication_year(work: &Value) -> Option<u64> {
    ["/published-print/date-parts/0/0", "/published-online/date-parts/0/0"]
        .iter()
        .find_map(|pointer| u64_at(work, pointer))
}
