//! `EnrichedItem` - a catalog item with its poster URL and providers.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::media::MediaType;
use crate::tmdb::{CatalogItem, ImageBase, Provider};

/// A catalog item ready to be filtered and written out.
///
/// Serializes with the upstream field names for its media type:
/// `title`/`release_date` for movies, `name`/`first_air_date` for series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedItem {
    /// Pipeline the item came from.
    pub media: MediaType,
    /// TMDB id.
    pub id: u64,
    /// Title (movies) or name (series).
    pub title: String,
    /// Overview text.
    pub overview: String,
    /// Absolute poster URL, absent when the item has no poster.
    pub poster_url: Option<String>,
    /// Release or first air date.
    pub release_date: Option<String>,
    /// Vote count, zero when absent upstream.
    pub vote_count: u32,
    /// Watch providers in the configured region.
    pub providers: Vec<Provider>,
}

impl EnrichedItem {
    /// Combines a raw item with its providers.
    #[must_use]
    pub fn new(
        media: MediaType,
        item: CatalogItem,
        images: &ImageBase,
        providers: Vec<Provider>,
    ) -> Self {
        Self {
            media,
            id: item.id,
            poster_url: images.resolve_opt(item.poster_path.as_deref()),
            title: item.title,
            overview: item.overview,
            release_date: item.release_date,
            vote_count: item.vote_count.unwrap_or(0),
            providers,
        }
    }
}

impl Serialize for EnrichedItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (title_key, date_key) = match self.media {
            MediaType::Movie => ("title", "release_date"),
            MediaType::Series => ("name", "first_air_date"),
        };

        let mut state = serializer.serialize_struct("EnrichedItem", 7)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field(title_key, &self.title)?;
        state.serialize_field("overview", &self.overview)?;
        state.serialize_field("poster_path", &self.poster_url)?;
        state.serialize_field(date_key, &self.release_date)?;
        state.serialize_field("vote_count", &self.vote_count)?;
        state.serialize_field("providers", &self.providers)?;
        state.end()
    }
}
