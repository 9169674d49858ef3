//! Inclusion criteria for collected items.

use super::item::EnrichedItem;

/// Default minimum vote count (exclusive).
pub const DEFAULT_MIN_VOTE_COUNT: u32 = 700;

/// Default latest accepted release year.
pub const DEFAULT_YEAR_CEILING: &str = "2025";

/// Thresholds an enriched item must pass to be kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Items need strictly more votes than this.
    pub min_vote_count: u32,
    /// Latest accepted year, compared as a string.
    pub year_ceiling: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            min_vote_count: DEFAULT_MIN_VOTE_COUNT,
            year_ceiling: String::from(DEFAULT_YEAR_CEILING),
        }
    }
}

impl FilterCriteria {
    /// Returns whether `item` has a year, a poster and enough votes.
    ///
    /// The year check is lexicographic (`"2025" <= "2025"`), which matches
    /// numeric order only for four-digit years.
    #[must_use]
    pub fn accepts(&self, item: &EnrichedItem) -> bool {
        let Some(year) = release_year(item.release_date.as_deref()) else {
            return false;
        };
        year <= self.year_ceiling.as_str()
            && item.poster_url.is_some()
            && item.vote_count > self.min_vote_count
    }
}

/// Takes the part of a date before the first `-`.
///
/// Missing dates and empty year parts yield `None`.
#[must_use]
pub fn release_year(date: Option<&str>) -> Option<&str> {
    date.and_then(|d| d.split('-').next())
        .filter(|year| !year.is_empty())
}
