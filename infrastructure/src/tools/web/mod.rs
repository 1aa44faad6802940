//! **Web Tools**: `fetch_url` and `rdap_domain`
//!
//! | Tool | Description | Upstream |
//! |------|-------------|----------|
//! | `fetch_url` | Fetch a URL, extract readable text from HTML | any http(s) host |
//! | `rdap_domain` | Domain registration status | `rdap.org` |
//!
//! Both are read-only. `fetch_url` is the only adapter whose host is chosen
//! by the caller; it still goes through the shared gateway, so the body
//! ceiling and timeout apply as for every other source.

mod fetch;
mod rdap;

pub use fetch::{FETCH_URL, FetchUrl};
pub use rdap::{RDAP_DOMAIN, RdapDomain};
