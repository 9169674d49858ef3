//! `CatalogApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{CatalogItem, Provider};
use crate::media::MediaType;

/// Catalog API trait.
///
/// Abstracts the two leaf calls the collector needs so tests can substitute
/// an in-memory catalog.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[trait_variant::make(CatalogApi: Send)]
pub trait LocalCatalogApi {
    /// Fetches one popularity-ranked discover page (1-indexed).
    ///
    /// Returns an empty list when the page carries no results.
    ///
    /// # Errors
    ///
    /// Returns an error wrapping [`crate::error::CatalogError`] if the HTTP
    /// request fails, the status is not a success or the JSON is malformed.
    async fn discover_page(&self, media: MediaType, page: u32) -> Result<Vec<CatalogItem>>;

    /// Fetches the watch-provider offers for one item in the configured region.
    ///
    /// Missing region data or offer kinds yield an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error wrapping [`crate::error::CatalogError`] if the HTTP
    /// request fails, the status is not a success or the JSON is malformed.
    async fn watch_providers(&self, media: MediaType, id: u64) -> Result<Vec<Provider>>;
}
