//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 discover and watch-provider
//! endpoints.

mod api;
mod client;
mod image;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{CatalogApi, LocalCatalogApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use image::{DEFAULT_IMAGE_BASE_URL, ImageBase};
pub use types::{CatalogItem, DiscoverQuery, Provider, RegionOffers};
