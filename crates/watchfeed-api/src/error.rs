//! Errors raised by the catalog client.

use thiserror::Error;

/// Failure talking to the catalog API.
///
/// Wrapped in `anyhow::Error` with page or item context by the collector;
/// recover it with `downcast_ref::<CatalogError>()`.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum CatalogError {
    /// The API answered with a non-success HTTP status.
    #[error("TMDB API error (HTTP {status}) on {path}: {message}")]
    Upstream {
        /// Request path relative to the API base URL.
        path: String,
        /// HTTP status code.
        status: u16,
        /// `status_message` from the error body, or the raw body.
        message: String,
    },

    /// The response body did not match the expected JSON shape.
    #[error("malformed TMDB response on {path}")]
    MalformedResponse {
        /// Request path relative to the API base URL.
        path: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// The request could not be sent or its body could not be read.
    #[error("TMDB request failed on {path}")]
    Request {
        /// Request path relative to the API base URL.
        path: String,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },
}

impl CatalogError {
    /// Returns the HTTP status for upstream errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            Self::MalformedResponse { .. } | Self::Request { .. } => None,
        }
    }
}
