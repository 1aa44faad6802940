//! Source code hosting: GitHub.

mod github;

pub use github::{GITHUB_REPO, GITHUB_SEARCH, GitHubRepo, GitHubSearch};
