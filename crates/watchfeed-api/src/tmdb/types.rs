//! TMDB API response types and request defaults.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::media::OfferKind;

// --- Discover ---

/// Response from the `discover/{movie|tv}` endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverResponse {
    /// Ranked results; absent on some out-of-range pages.
    #[serde(default)]
    pub results: Vec<CatalogItem>,
}

/// A single movie or TV series from a discover page.
///
/// Movies carry `title`/`release_date`, series carry `name`/`first_air_date`;
/// both land in the same fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogItem {
    /// TMDB id.
    pub id: u64,
    /// Localized title (movies) or name (series).
    #[serde(alias = "name")]
    pub title: String,
    /// Overview text.
    pub overview: String,
    /// Poster image path relative to the image base URL.
    pub poster_path: Option<String>,
    /// Release date (movies) or first air date (series), `YYYY-MM-DD`.
    #[serde(alias = "first_air_date")]
    pub release_date: Option<String>,
    /// Vote count.
    pub vote_count: Option<u32>,
}

/// Query parameters shared by every discover request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverQuery {
    /// Response language.
    pub language: String,
    /// `with_original_language` filter (ISO 639-1).
    pub original_language: String,
    /// Sort key.
    pub sort_by: String,
    /// Whether adult titles are included.
    pub include_adult: bool,
    /// Whether video-only entries are included (movies).
    pub include_video: bool,
}

impl Default for DiscoverQuery {
    fn default() -> Self {
        Self {
            language: String::from("en-US"),
            original_language: String::from("en"),
            sort_by: String::from("popularity.desc"),
            include_adult: false,
            include_video: false,
        }
    }
}

impl DiscoverQuery {
    /// Builds the query pairs for one page.
    pub(crate) fn to_pairs(&self, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("include_adult", self.include_adult.to_string()),
            ("include_video", self.include_video.to_string()),
            ("language", self.language.clone()),
            ("page", page.to_string()),
            ("sort_by", self.sort_by.clone()),
            ("with_original_language", self.original_language.clone()),
        ]
    }
}

// --- Watch providers ---

/// Response from `{movie|tv}/{id}/watch/providers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchProvidersResponse {
    /// Offers keyed by ISO 3166-1 region.
    #[serde(default)]
    pub results: HashMap<String, RegionOffers>,
}

/// Offers available in one region.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionOffers {
    /// Subscription offers.
    #[serde(default)]
    pub flatrate: Vec<ProviderEntry>,
    /// Rental offers.
    #[serde(default)]
    pub rent: Vec<ProviderEntry>,
}

impl RegionOffers {
    /// Returns the entries listed under `kind`.
    #[must_use]
    pub fn offers(&self, kind: OfferKind) -> &[ProviderEntry] {
        match kind {
            OfferKind::Flatrate => &self.flatrate,
            OfferKind::Rent => &self.rent,
        }
    }
}

/// Raw provider entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderEntry {
    /// Display name.
    pub provider_name: String,
    /// Logo path relative to the image base URL.
    pub logo_path: String,
}

/// A streaming provider offering an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provider {
    /// Display name.
    pub name: String,
    /// Absolute logo URL.
    #[serde(rename = "logo_path")]
    pub logo_url: String,
}

// --- Errors ---

/// Error body returned by TMDB on failures.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB-specific status code.
    pub status_code: u32,
    /// Human-readable message.
    pub status_message: String,
}
