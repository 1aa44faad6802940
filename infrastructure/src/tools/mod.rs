//! Source adapters and the registry that runs them
//!
//! Each adapter wraps one public knowledge source and is exposed to the agent
//! as a tool. Adapters are grouped by kind of source:
//!
//! | Module | Tools |
//! |--------|-------|
//! | `encyclopedia` | `wikipedia_search`, `wikipedia_article`, `wikidata_search`, `duckduckgo_instant` |
//! | `academic` | `openalex_search`, `arxiv_search`, `pubmed_search`, `crossref_search`, `open_library_search` |
//! | `community` | `reddit_search`, `reddit_list`, `hackernews_search` |
//! | `code` | `github_search`, `github_repo` |
//! | `catalog` | `steam_search`, `steam_app_details`, `steam_reviews` |
//! | `video` | `youtube_feed`, `youtube_oembed` |
//! | `web` | `fetch_url`, `rdap_domain` |
//!
//! Every tool in the default catalog is read-only.

pub mod academic;
pub mod catalog;
pub mod code;
pub mod community;
pub mod encyclopedia;
pub mod normalize;
pub mod video;
pub mod web;

mod common;
mod registry;
mod schema;

#[cfg(test)]
mod test_support;

pub use registry::AdapterRegistry;
pub use schema::JsonSchemaToolConverter;

use crate::http::{GatewayError, ReqwestGateway};
use scout_application::{Adapter, AdapterSettings};
use scout_domain::ToolSpec;
use std::sync::Arc;

/// The default catalog, one entry per tool.
pub fn default_adapters() -> Vec<Arc<dyn Adapter>> {
    vec![
        Arc::new(encyclopedia::DuckDuckGoInstant),
        Arc::new(encyclopedia::WikipediaSearch),
        Arc::new(encyclopedia::WikipediaArticle),
        Arc::new(encyclopedia::WikidataSearch),
        Arc::new(academic::OpenAlexSearch),
        Arc::new(academic::ArxivSearch),
        Arc::new(academic::PubMedSearch),
        Arc::new(academic::CrossrefSearch),
        Arc::new(academic::OpenLibrarySearch),
        Arc::new(community::RedditSearch),
        Arc::new(community::RedditList),
        Arc::new(community::HackerNewsSearch),
        Arc::new(code::GitHubSearch),
        Arc::new(code::GitHubRepo),
        Arc::new(catalog::SteamSearch),
        Arc::new(catalog::SteamAppDetails),
        Arc::new(catalog::SteamReviews),
        Arc::new(web::RdapDomain),
        Arc::new(video::YouTubeFeed),
        Arc::new(video::YouTubeOembed),
        Arc::new(web::FetchUrl),
    ]
}

/// Registry over a fresh [`ReqwestGateway`] with the default catalog.
pub fn default_registry(settings: AdapterSettings) -> Result<AdapterRegistry, GatewayError> {
    let gateway = Arc::new(ReqwestGateway::new(&settings)?);
    Ok(default_adapters()
        .into_iter()
        .fold(AdapterRegistry::new(gateway, settings), |registry, adapter| {
            registry.register_arc(adapter)
        }))
}

/// Definitions of the default catalog, without building a client.
pub fn default_tool_spec() -> ToolSpec {
    default_adapters()
        .iter()
        .fold(ToolSpec::new(), |spec, adapter| spec.register(adapter.definition()))
}
