//! Scholarly sources: OpenAlex, arXiv, PubMed, Crossref and Open Library.
//!
//! OpenAlex and Crossref offer a faster "polite pool" to clients that identify
//! themselves; when a contact address is configured it is sent as `mailto`
//! here and appended to the user agent by the gateway.

mod arxiv;
mod crossref;
mod open_library;
mod openalex;
mod pubmed;

pub use arxiv::{ARXIV_SEARCH, ArxivSearch};
pub use crossref::{CROSSREF_SEARCH, CrossrefSearch};
pub use open_library::{OPEN_LIBRARY_SEARCH, OpenLibrarySearch};
pub use openalex::{OPENALEX_SEARCH, OpenAlexSearch};
pub use pubmed::{PUBMED_SEARCH, PubMedSearch};
