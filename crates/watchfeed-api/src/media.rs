//! Media types and watch-provider offer kinds.

use std::fmt;

/// Kind of catalog entry a pipeline works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// Feature films (`/movie` endpoints).
    Movie,
    /// TV series (`/tv` endpoints).
    Series,
}

impl MediaType {
    /// Path segment used by the TMDB v3 endpoints.
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "tv",
        }
    }

    /// Offer kinds read from the watch-providers payload.
    ///
    /// Movies take subscription and rental offers, series only subscription.
    #[must_use]
    pub const fn offer_kinds(self) -> &'static [OfferKind] {
        match self {
            Self::Movie => &[OfferKind::Flatrate, OfferKind::Rent],
            Self::Series => &[OfferKind::Flatrate],
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movie => f.write_str("movie"),
            Self::Series => f.write_str("series"),
        }
    }
}

/// Category of provider access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OfferKind {
    /// Included with a subscription.
    Flatrate,
    /// Available to rent.
    Rent,
}

impl OfferKind {
    /// JSON key of this offer kind inside a region object.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Flatrate => "flatrate",
            Self::Rent => "rent",
        }
    }
}
