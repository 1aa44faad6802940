//! `youtube_feed` and `youtube_oembed`
//!
//! Both use YouTube's keyless public endpoints: the per-channel Atom feed
//! (`/feeds/videos.xml`) and the oEmbed metadata endpoint.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Url;
use scout_application::{Adapter, AdapterContext};
use scout_domain::{
    Failure, FailureKind, Item, ItemList, Payload, ToolCall, ToolDefinition, ToolParameter,
};
use serde::Deserialize;
use std::sync::LazyLock;

use crate::tools::common::{limit_parameter, not_found_on_404, required, typed_args};
use crate::tools::normalize::{parse_json, xml_attr, xml_blocks, xml_text};

pub const YOUTUBE_FEED: &str = "youtube_feed";
pub const YOUTUBE_OEMBED: &str = "youtube_oembed";

const FEED_URL: &str = "https://www.youtube.com/feeds/videos.xml";
const OEMBED_URL: &str = "https://www.youtube.com/oembed";
const WATCH_URL: &str = "https://www.youtube.com/watch";

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());
static EMBEDDED_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^A-Za-z0-9_-])([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)").unwrap()
});

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FeedArgs {
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    channel_id: Option<String>,
    #[serde(default)]
    limit: Option<u64>,
}

impl FeedArgs {
    /// The one feed selector given, as its query pair.
    fn selector(&self) -> Result<(&'static str, &str), Failure> {
        let user = self.user.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let channel = self
            .channel_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        match (user, channel) {
            (Some(user), None) => Ok(("user", user)),
            (None, Some(channel)) => Ok(("channel_id", channel)),
            _ => Err(Failure::invalid_argument(
                "Provide exactly one of: user, channel_id",
            )),
        }
    }
}

/// Recent uploads of one channel.
pub struct YouTubeFeed;

#[async_trait]
impl Adapter for YouTubeFeed {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            YOUTUBE_FEED,
            "List a YouTube channel's recent uploads from its public feed. Give exactly one of \
             user or channel_id.",
        )
        .with_parameter(ToolParameter::new("user", "Legacy YouTube username", false))
        .with_parameter(ToolParameter::new(
            "channel_id",
            "Channel id (usually starts with UC)",
            false,
        ))
        .with_parameter(limit_parameter())
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let args: FeedArgs = typed_args(call)?;
        let (key, value) = args.selector()?;
        let limits = ctx.limits();
        let limit = limits.clamp_count(args.limit);

        let request = ctx
            .request(FEED_URL)
            .query(key, value)
            .header("Accept", "application/atom+xml, application/xml, text/xml, */*");
        let xml = ctx
            .fetch(request)
            .await
            .map_err(|e| not_found_on_404(e, format!("YouTube feed for {} '{}'", key, value)))?
            .text();

        // Channel metadata lives before the first entry.
        let header = xml.split("<entry").next().unwrap_or_default();
        let channel_url = xml_attr(header, "link", "href", Some(("rel", "alternate")))
            .into_iter()
            .next();
        let channel_id_uc = channel_url.as_deref().and_then(channel_id_from_url);
        let feed = Item::new()
            .with_opt("id", xml_text(header, "id"))
            .with_opt("channel_id", xml_text(header, "yt:channelId"))
            .with_opt("title", xml_text(header, "title"))
            .with_opt(
                "author",
                xml_blocks(header, "author")
                    .first()
                    .and_then(|author| xml_text(author, "name")),
            )
            .with_opt("channel_url", channel_url.clone())
            .with_opt("channel_id_uc", channel_id_uc);

        let videos: Vec<Item> = xml_blocks(&xml, "entry")
            .into_iter()
            .map(|entry| {
                let description = xml_text(entry, "media:description").unwrap_or_default();
                Item::new()
                    .with("video_id", xml_text(entry, "yt:videoId").unwrap_or_default())
                    .with("title", xml_text(entry, "title").unwrap_or_default())
                    .with_opt(
                        "url",
                        xml_attr(entry, "link", "href", Some(("rel", "alternate")))
                            .into_iter()
                            .next(),
                    )
                    .with_opt("published", xml_text(entry, "published"))
                    .with_opt("updated", xml_text(entry, "updated"))
                    .with_opt(
                        "views",
                        xml_attr(entry, "media:statistics", "views", None)
                            .first()
                            .and_then(|v| v.parse::<u64>().ok()),
                    )
                    .with_opt(
                        "thumbnail",
                        xml_attr(entry, "media:thumbnail", "url", None)
                            .into_iter()
                            .next(),
                    )
                    .with_text("description", limits.snippet(&description))
            })
            .collect();

        Ok(Item::new()
            .with(
                "url",
                format!("{}?{}={}", FEED_URL, key, urlencoding::encode(value)),
            )
            .with("feed", feed.into_value())
            .with_items("videos", ItemList::bounded(videos, limit))
            .into())
    }
}

/// `UC...` id from a `/channel/<id>` URL.
fn channel_id_from_url(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [.., "channel", id] => Some((*id).to_string()),
        _ => None,
    }
}

/// Video metadata through oEmbed.
pub struct YouTubeOembed;

#[async_trait]
impl Adapter for YouTubeOembed {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            YOUTUBE_OEMBED,
            "Get a YouTube video's title, channel and thumbnail via oEmbed. Accepts watch, \
             youtu.be, shorts, embed and live URLs or a bare 11-character video id.",
        )
        .with_parameter(ToolParameter::new(
            "url_or_id",
            "YouTube video URL or video id",
            true,
        ))
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let input = required(call, "url_or_id")?;
        let video_id = extract_video_id(input).ok_or_else(|| {
            Failure::invalid_argument(format!(
                "Could not extract a YouTube video id from '{}'",
                input
            ))
        })?;
        let video_url = format!("{}?v={}", WATCH_URL, video_id);

        let request = ctx
            .request(OEMBED_URL)
            .query("url", &video_url)
            .query("format", "json")
            .header("Accept", "application/json, */*");
        let response = ctx.fetch(request).await.map_err(|e| {
            // 401 is what oEmbed answers for private or embed-disabled videos.
            if e.kind == FailureKind::HttpError && matches!(e.status, Some(401 | 404)) {
                let status = e.status.unwrap_or(404);
                Failure::not_found(format!("YouTube video {}", video_id)).with_status(status)
            } else {
                e
            }
        })?;
        let data = parse_json(&response)?;

        Ok(Item::new()
            .with("video_id", video_id.as_str())
            .with("video_url", video_url)
            .with("title", data["title"].as_str().unwrap_or_default())
            .with_nonempty("author_name", data["author_name"].as_str())
            .with_nonempty("author_url", data["author_url"].as_str())
            .with_nonempty("thumbnail_url", data["thumbnail_url"].as_str())
            .with_nonempty("provider_name", data["provider_name"].as_str())
            .into())
    }
}

/// Video id from a bare id, a YouTube URL, or text containing one.
fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if VIDEO_ID_RE.is_match(input) {
        return Some(input.to_string());
    }

    let token = input.split_whitespace().next()?;
    if let Ok(url) = Url::parse(token) {
        let host = url.host_str().unwrap_or_default().to_lowercase();
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        if host.contains("youtube.com") {
            let from_query = url
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned())
                .filter(|v| VIDEO_ID_RE.is_match(v));
            if from_query.is_some() {
                return from_query;
            }
            let from_path = segments
                .windows(2)
                .find(|pair| matches!(pair[0], "shorts" | "embed" | "live"))
                .map(|pair| pair[1])
                .filter(|id| VIDEO_ID_RE.is_match(id));
            if let Some(id) = from_path {
                return Some(id.to_string());
            }
        }
        if host.contains("youtu.be") {
            if let Some(id) = segments.first().filter(|id| VIDEO_ID_RE.is_match(id)) {
                return Some((*id).to_string());
            }
        }
    }

    EMBEDDED_ID_RE
        .captures(input)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
