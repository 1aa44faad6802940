//! General reference sources: Wikipedia, Wikidata and DuckDuckGo Instant
//! Answers.

mod duckduckgo;
mod wikidata;
mod wikipedia;

pub use duckduckgo::{DUCKDUCKGO_INSTANT, DuckDuckGoInstant};
pub use wikidata::{WIKIDATA_SEARCH, WikidataSearch};
pub use wikipedia::{WIKIPEDIA_ARTICLE, WIKIPEDIA_SEARCH, WikipediaArticle, WikipediaSearch};
