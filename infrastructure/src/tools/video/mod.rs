//! Video platforms: YouTube.

mod youtube;

pub use youtube::{YOUTUBE_FEED, YOUTUBE_OEMBED, YouTubeFeed, YouTubeOembed};
