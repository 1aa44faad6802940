//! `arxiv_search`
//!
//! The arXiv API answers with an Atom feed; entries are pulled apart with the
//! XML helpers in [`normalize`](crate::tools::normalize).

use async_trait::async_trait;
use scout_application::{Adapter, AdapterContext};
use scout_domain::{Failure, Item, ItemList, Payload, ToolCall, ToolDefinition};

use crate::tools::common::{query_parameter, required};
use crate::tools::normalize::{date_prefix, xml_attr, xml_blocks, xml_text, xml_texts};

pub const ARXIV_SEARCH: &str = "arxiv_search";

const API_URL: &str = "http://export.arxiv.org/api/query";
const MAX_AUTHORS: usize = 5;
const MAX_CATEGORIES: usize = 5;

/// Preprint search over arXiv.
pub struct ArxivSearch;

#[async_trait]
impl Adapter for ArxivSearch {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            ARXIV_SEARCH,
            "Search arXiv preprints (physics, mathematics, computer science, quantitative \
             biology, statistics). Returns titles, authors, abstracts and PDF links.",
        )
        .with_parameter(query_parameter("Search terms"))
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let query = required(call, "query")?;
        let limits = ctx.limits();

        let request = ctx
            .request(API_URL)
            .query("search_query", format!("all:{}", query))
            .query("start", 0)
            .query("max_results", limits.max_items)
            .header("Accept", "application/atom+xml, application/xml, */*");
        let feed = ctx.fetch(request).await?.text();

        let items = xml_blocks(&feed, "entry")
            .into_iter()
            .map(|entry| {
                let url = xml_text(entry, "id").unwrap_or_default();
                let arxiv_id = url.split_once("/abs/").map(|(_, id)| id.to_string());
                let pdf_url = arxiv_id
                    .as_ref()
                    .map(|_| format!("{}.pdf", url.replacen("/abs/", "/pdf/", 1)));
                let authors: Vec<String> = xml_blocks(entry, "author")
                    .into_iter()
                    .filter_map(|author| xml_text(author, "name"))
                    .take(MAX_AUTHORS)
                    .collect();
                let categories: Vec<String> = xml_attr(entry, "category", "term", None)
                    .into_iter()
                    .take(MAX_CATEGORIES)
                    .collect();
                let summary = xml_texts(entry, "summary").join(" ");

                Item::new()
                    .with("title", xml_text(entry, "title").unwrap_or_default())
                    .with("authors", authors)
                    .with_text("abstract", limits.snippet(&summary))
                    .with_opt("arxiv_id", arxiv_id)
                    .with_nonempty("url", Some(url.as_str()))
                    .with_opt("pdf_url", pdf_url)
                    .with_opt("published", xml_text(entry, "published").map(|p| date_prefix(&p)))
                    .with("categories", categories)
            })
            .collect();

        Ok(ItemList::bounded(items, limits.max_items).into())
    }
}
