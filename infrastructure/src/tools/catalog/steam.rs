//! `steam_search`, `steam_app_details` and `steam_reviews`
//!
//! Details and reviews accept either a numeric app id or a game name; a name
//! is resolved to the first store-search hit before the lookup.

use async_trait::async_trait;
use regex::Regex;
use scout_application::{Adapter, AdapterContext};
use scout_domain::{
    Failure, FailureKind, Item, ItemList, Limits, Payload, ToolCall, ToolDefinition,
    ToolParameter,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

use crate::tools::common::{query_parameter, required, typed_args};
use crate::tools::normalize::{array_at, parse_json, str_at, strings_at, strip_tags, u64_at};

pub const STEAM_SEARCH: &str = "steam_search";
pub const STEAM_APP_DETAILS: &str = "steam_app_details";
pub const STEAM_REVIEWS: &str = "steam_reviews";

const STORE_URL: &str = "https://store.steampowered.com";

static BBCODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[/?[^\]]+\]").unwrap());

/// Store search by game name.
pub struct SteamSearch;

#[async_trait]
impl Adapter for SteamSearch {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            STEAM_SEARCH,
            "Search the Steam store by game name. Returns app ids, names, prices and discounts. \
             A bare numeric app id returns that app's details.",
        )
        .with_parameter(query_parameter("Game name, or a numeric app id"))
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let query = required(call, "query")?;
        let limits = ctx.limits();

        if let Some(app_id) = parse_app_id(query) {
            return Ok(match fetch_details(ctx, app_id).await {
                Ok(item) => ItemList::bounded(vec![item], limits.max_items).with_total(Some(1)),
                Err(e) if e.kind == FailureKind::NotFound => ItemList::empty(),
                Err(e) => return Err(e),
            }
            .into());
        }

        let data = store_search(ctx, query).await?;
        let items = array_at(&data, "/items")
            .iter()
            .filter_map(|app| {
                let id = u64_at(app, "/id")?;
                let mut item = Item::new()
                    .with("app_id", id)
                    .with("name", app["name"].as_str().unwrap_or_default())
                    .with("url", app_url(id));
                if let Some(cents) = u64_at(app, "/price/final").filter(|c| *c > 0) {
                    item = item.with("price", format!("${:.2}", cents as f64 / 100.0));
                }
                if let Some(discount) = u64_at(app, "/price/discount_percent").filter(|d| *d > 0) {
                    item = item.with("discount", format!("{}%", discount));
                }
                Some(item)
            })
            .collect();

        Ok(ItemList::bounded(items, limits.max_items)
            .with_total(u64_at(&data, "/total"))
            .into())
    }
}

/// Store page data for one app.
pub struct SteamAppDetails;

#[async_trait]
impl Adapter for SteamAppDetails {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            STEAM_APP_DETAILS,
            "Get Steam store details for a game: description, genres, developers, release date, \
             Metacritic score, price, platforms and languages.",
        )
        .with_parameter(ToolParameter::new("app", "Numeric app id or game name", true))
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let app = required(call, "app")?;
        let app_id = resolve_app_id(ctx, app).await?;
        Ok(fetch_details(ctx, app_id).await?.into())
    }
}

/// Which reviews Steam returns first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ReviewFilter {
    /// Steam's helpfulness ordering
    #[default]
    #[serde(alias = "helpful")]
    All,
    Recent,
    Updated,
}

impl ReviewFilter {
    fn as_str(self) -> &'static str {
        match self {
            ReviewFilter::All => "all",
            ReviewFilter::Recent => "recent",
            ReviewFilter::Updated => "updated",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReviewArgs {
    app: String,
    #[serde(default)]
    num_reviews: Option<u64>,
    #[serde(default)]
    filter: ReviewFilter,
}

/// User reviews plus the store's review summary.
pub struct SteamReviews;

#[async_trait]
impl Adapter for SteamReviews {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            STEAM_REVIEWS,
            "Fetch Steam user reviews for a game: review totals, positive share and review texts \
             with playtime and votes.",
        )
        .with_parameter(ToolParameter::new("app", "Numeric app id or game name", true))
        .with_parameter(
            ToolParameter::new(
                "num_reviews",
                "Number of reviews to return (capped by the configured list limit)",
                false,
            )
            .with_type("integer"),
        )
        .with_parameter(
            ToolParameter::new("filter", "Review ordering (`helpful` is the same as `all`)", false)
                .with_choices(&["all", "helpful", "recent", "updated"])
                .with_default("all"),
        )
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let args: ReviewArgs = typed_args(call)?;
        let app = args.app.trim();
        if app.is_empty() {
            return Err(Failure::invalid_argument("Argument 'app' must not be empty"));
        }
        let app_id = resolve_app_id(ctx, app).await?;
        let limits = ctx.limits();
        let count = limits.clamp_count(args.num_reviews);

        let request = ctx
            .request(format!("{}/appreviews/{}", STORE_URL, app_id))
            .query("json", 1)
            .query("language", "english")
            .query("num_per_page", count)
            .query("filter", args.filter.as_str())
            .query("purchase_type", "all");
        let data = parse_json(&ctx.fetch(request).await?)?;
        if !data["success"].as_bool().unwrap_or(false) && data["success"].as_u64() != Some(1) {
            return Err(Failure::not_found(format!("reviews for Steam app {}", app_id)));
        }

        let total = u64_at(&data, "/query_summary/total_reviews").unwrap_or(0);
        let positive = u64_at(&data, "/query_summary/total_positive").unwrap_or(0);
        let reviews: Vec<Item> = array_at(&data, "/reviews")
            .iter()
            .map(|review| review_item(review, limits))
            .collect();

        Ok(Item::new()
            .with("app_id", app_id)
            .with("total_reviews", total)
            .with("total_positive", positive)
            .with(
                "total_negative",
                u64_at(&data, "/query_summary/total_negative").unwrap_or(0),
            )
            .with_nonempty(
                "review_score_desc",
                str_at(&data, "/query_summary/review_score_desc"),
            )
            .with_opt(
                "positive_percent",
                (total > 0).then(|| round1(100.0 * positive as f64 / total as f64)),
            )
            .with_items("reviews", ItemList::bounded(reviews, count))
            .into())
    }
}

fn review_item(review: &Value, limits: &Limits) -> Item {
    let minutes = u64_at(review, "/author/playtime_forever").unwrap_or(0);
    let text = BBCODE_RE.replace_all(review["review"].as_str().unwrap_or_default(), "");
    Item::new()
        .with("recommended", review["voted_up"].as_bool().unwrap_or(false))
        .with("playtime_hours", round1(minutes as f64 / 60.0))
        .with("votes_up", u64_at(review, "/votes_up").unwrap_or(0))
        .with("votes_funny", u64_at(review, "/votes_funny").unwrap_or(0))
        .with_text("text", limits.content(text.trim()))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// A bare numeric app id; anything else is a game name.
fn parse_app_id(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

fn app_url(app_id: u64) -> String {
    format!("{}/app/{}", STORE_URL, app_id)
}

async fn store_search(ctx: &AdapterContext<'_>, term: &str) -> Result<Value, Failure> {
    let request = ctx
        .request(format!("{}/api/storesearch/", STORE_URL))
        .query("term", term)
        .query("cc", "us")
        .query("l", "en");
    parse_json(&ctx.fetch(request).await?)
}

/// Bare ids pass through; names resolve to the first store-search hit.
async fn resolve_app_id(ctx: &AdapterContext<'_>, app: &str) -> Result<u64, Failure> {
    let app = app.trim();
    if let Some(app_id) = parse_app_id(app) {
        return Ok(app_id);
    }
    let data = store_search(ctx, app).await?;
    array_at(&data, "/items")
        .first()
        .and_then(|hit| u64_at(hit, "/id"))
        .ok_or_else(|| Failure::not_found(format!("Steam app '{}'", app)))
}

async fn fetch_details(ctx: &AdapterContext<'_>, app_id: u64) -> Result<Item, Failure> {
    let request = ctx
        .request(format!("{}/api/appdetails", STORE_URL))
        .query("appids", app_id)
        .query("cc", "us")
        .query("l", "en");
    let data = parse_json(&ctx.fetch(request).await?)?;

    let entry = &data[app_id.to_string().as_str()];
    if !entry["success"].as_bool().unwrap_or(false) {
        return Err(Failure::not_found(format!("Steam app {}", app_id)));
    }
    Ok(details_item(app_id, &entry["data"], ctx.limits()))
}

fn details_item(app_id: u64, info: &Value, limits: &Limits) -> Item {
    let descriptions = |pointer: &str| -> Vec<String> {
        array_at(info, pointer)
            .iter()
            .filter_map(|v| v["description"].as_str())
            .map(str::to_string)
            .collect()
    };

    let mut item = Item::new()
        .with("app_id", app_id)
        .with("name", info["name"].as_str().unwrap_or_default())
        .with_nonempty("type", info["type"].as_str())
        .with("is_free", info["is_free"].as_bool().unwrap_or(false))
        .with_text(
            "short_description",
            limits.snippet(&strip_tags(info["short_description"].as_str().unwrap_or_default())),
        )
        .with("developers", strings_at(info, "/developers"))
        .with("publishers", strings_at(info, "/publishers"))
        .with("genres", descriptions("/genres"))
        .with("categories", descriptions("/categories"))
        .with("url", app_url(app_id));

    if info["release_date"].is_object() {
        item = item
            .with_nonempty("release_date", str_at(info, "/release_date/date"))
            .with(
                "coming_soon",
                info.pointer("/release_date/coming_soon")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            );
    }
    if info["metacritic"].is_object() {
        item = item
            .with_opt("metacritic_score", u64_at(info, "/metacritic/score"))
            .with_nonempty("metacritic_url", str_at(info, "/metacritic/url"));
    }
    item = item
        .with_opt(
            "total_recommendations",
            u64_at(info, "/recommendations/total"),
        )
        .with_nonempty("price", str_at(info, "/price_overview/final_formatted"))
        .with_opt(
            "discount_percent",
            u64_at(info, "/price_overview/discount_percent").filter(|d| *d > 0),
        );
    if info["platforms"].is_object() {
        item = item.with("platforms", info["platforms"].clone());
    }
    item = item.with_nonempty("controller_support", info["controller_support"].as_str());
    if let Some(dlc) = info["dlc"].as_array().filter(|d| !d.is_empty()) {
        item = item.with("dlc_count", dlc.len());
    }
    if let Some(languages) = info["supported_languages"].as_str() {
        // "English<strong>*</strong>, French<br><strong>*</strong>languages with full audio support"
        let languages = strip_tags(languages);
        item = item.with_text("supported_languages", limits.snippet(&languages));
    }
    item
}
