//! Absolute image URL construction.

/// Default TMDB image base (w500 renditions).
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Prefix joined with API-relative poster and logo paths.
///
/// Joining is plain concatenation; the resulting URL is not checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBase(String);

impl ImageBase {
    /// Creates an image base from a URL prefix.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into())
    }

    /// Joins `path` onto the base.
    #[must_use]
    pub fn resolve(&self, path: &str) -> String {
        format!("{}{path}", self.0)
    }

    /// Joins an optional path. Absent or empty paths yield `None`.
    #[must_use]
    pub fn resolve_opt(&self, path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty()).map(|p| self.resolve(p))
    }
}

impl Default for ImageBase {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE_URL)
    }
}
