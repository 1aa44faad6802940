//! Product catalogs: the Steam store.

mod steam;

pub use steam::{
    STEAM_APP_DETAILS, STEAM_REVIEWS, STEAM_SEARCH, SteamAppDetails, SteamReviews, SteamSearch,
};
