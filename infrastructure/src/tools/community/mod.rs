//! Community discussion sources: Reddit and Hacker News.

mod hackernews;
mod reddit;

pub use hackernews::{HACKERNEWS_SEARCH, HackerNewsSearch};
pub use reddit::{REDDIT_LIST, REDDIT_SEARCH, RedditList, RedditSearch};
