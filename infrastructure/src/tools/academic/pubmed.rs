//! `pubmed_search`
//!
//! Two E-utilities round trips: `esearch` (JSON) resolves the query to PMIDs,
//! then `efetch` (XML) returns the article records.

use async_trait::async_trait;
use scout_application::{Adapter, AdapterContext};
use scout_domain::{Failure, Item, ItemList, Payload, ToolCall, ToolDefinition};

use crate::tools::common::{query_parameter, required};
use crate::tools::normalize::{
    parse_json, strings_at, u64_at, xml_attr, xml_blocks, xml_text, xml_texts,
};

pub const PUBMED_SEARCH: &str = "pubmed_search";

const ESEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";
const EFETCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";
const ARTICLE_URL: &str = "https://pubmed.ncbi.nlm.nih.gov";
const MAX_AUTHORS: usize = 5;

/// Biomedical literature search over PubMed.
pub struct PubMedSearch;

#[async_trait]
impl Adapter for PubMedSearch {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            PUBMED_SEARCH,
            "Search PubMed for biomedical and life-science literature. Returns titles, authors, \
             abstracts, PMIDs, journals and DOIs.",
        )
        .with_parameter(query_parameter("Search terms (PubMed query syntax accepted)"))
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let query = required(call, "query")?;
        let limits = ctx.limits();

        let search = ctx
            .request(ESEARCH_URL)
            .query("db", "pubmed")
            .query("term", query)
            .query("retmax", limits.max_items)
            .query("retmode", "json");
        let search = parse_json(&ctx.fetch(search).await?)?;

        let total = u64_at(&search, "/esearchresult/count");
        let ids = strings_at(&search, "/esearchresult/idlist");
        if ids.is_empty() {
            return Ok(ItemList::empty().with_total(total).into());
        }

        let fetch = ctx
            .request(EFETCH_URL)
            .query("db", "pubmed")
            .query("id", ids.join(","))
            .query("retmode", "xml");
        let xml = ctx.fetch(fetch).await?.text();

        let items = xml_blocks(&xml, "PubmedArticle")
            .into_iter()
            .map(|article| {
                let abstract_text = xml_blocks(article, "Abstract")
                    .into_iter()
                    .next()
                    .map(|block| xml_texts(block, "AbstractText").join(" "))
                    .unwrap_or_default();
                let authors: Vec<String> = xml_blocks(article, "Author")
                    .into_iter()
                    .filter_map(author_name)
                    .take(MAX_AUTHORS)
                    .collect();
                let pmid = xml_text(article, "PMID");
                let year = xml_blocks(article, "PubDate")
                    .into_iter()
                    .next()
                    .and_then(|date| xml_text(date, "Year"));
                let journal = xml_blocks(article, "Journal")
                    .into_iter()
                    .next()
                    .and_then(|journal| xml_text(journal, "Title"));
                let doi = doi_of(article);

                Item::new()
                    .with("title", xml_text(article, "ArticleTitle").unwrap_or_default())
                    .with("authors", authors)
                    .with_text("abstract", limits.snippet(&abstract_text))
                    .with_opt("url", pmid.as_ref().map(|id| format!("{}/{}/", ARTICLE_URL, id)))
                    .with_opt("pmid", pmid)
                    .with_opt("year", year)
                    .with_opt("journal", journal)
                    .with_opt("doi", doi.map(|d| format!("https://doi.org/{}", d)))
            })
            .collect();

        Ok(ItemList::bounded(items, limits.max_items)
            .with_total(total)
            .into())
    }
}

/// "ForeName LastName", or just the last name; collective authors are skipped.
fn author_name(author: &str) -> Option<String> {
    let last = xml_text(author, "LastName")?;
    Some(match xml_text(author, "ForeName") {
        Some(first) => format!("{} {}", first, last),
        None => last,
    })
}

/// The article's own DOI (`<ArticleId IdType="doi">`), ignoring cited references.
fn doi_of(article: &str) -> Option<String> {
    let ids = xml_blocks(article, "ArticleIdList").into_iter().next()?;
    let types = xml_attr(ids, "ArticleId", "IdType", None);
    let values = xml_texts(ids, "ArticleId");
    types
        .into_iter()
        .zip(values)
        .find(|(kind, _)| kind == "doi")
        .map(|(_, value)| value)
}
