//! Catalog client library for watchfeed.
//!
//! Provides the TMDB discover/watch-provider client and the collector that
//! pages through it, enriches items with streaming providers and keeps the
//! ones that pass the configured thresholds.

/// Paginated, filtered collection over the catalog API.
pub mod collector;

/// Typed catalog errors.
pub mod error;

/// Media types and provider offer kinds.
pub mod media;

/// TMDB API client.
pub mod tmdb;
