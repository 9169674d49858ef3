//! `TmdbClient` - TMDB API client implementation.

use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::header::ACCEPT;
use tracing::instrument;
use url::Url;

use super::api::LocalCatalogApi;
use super::image::ImageBase;
use super::types::{
    CatalogItem, DiscoverQuery, DiscoverResponse, Provider, TmdbErrorResponse,
    WatchProvidersResponse,
};
use crate::error::CatalogError;
use crate::media::MediaType;

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default region for watch-provider lookups.
const DEFAULT_REGION: &str = "US";

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
    /// Optional v3 `api_key` query parameter.
    api_key: Option<String>,
    /// Query parameters for discover requests.
    discover: DiscoverQuery,
    /// Region key read from watch-provider results.
    region: String,
    /// Prefix for logo URLs.
    images: ImageBase,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    api_key: Option<String>,
    user_agent: Option<String>,
    discover: Option<DiscoverQuery>,
    region: Option<String>,
    images: Option<ImageBase>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            api_key: None,
            user_agent: None,
            discover: None,
            region: None,
            images: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the v3 `api_key` sent with discover requests.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Overrides the discover query parameters.
    #[must_use]
    pub fn discover_query(mut self, query: DiscoverQuery) -> Self {
        self.discover = Some(query);
        self
    }

    /// Sets the watch-provider region (default: `US`).
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sets the image base used for provider logos.
    #[must_use]
    pub fn image_base(mut self, images: ImageBase) -> Self {
        self.images = Some(images);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self.api_token.context("api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
            api_key: self.api_key,
            discover: self.discover.unwrap_or_default(),
            region: self
                .region
                .unwrap_or_else(|| String::from(DEFAULT_REGION)),
            images: self.images.unwrap_or_default(),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Sends a GET request with Bearer auth and query params.
    ///
    /// Failures are not retried.
    #[instrument(skip_all, fields(path = %path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let request = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_token)
            .header(ACCEPT, "application/json")
            .query(query)
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(url = %request.url(), "TMDB API request");

        let result = self.http_client.execute(request).await;
        let response = result.map_err(|source| CatalogError::Request {
            path: String::from(path),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            let message = serde_json::from_str::<TmdbErrorResponse>(&body).map_or(body, |e| {
                format!("code={}, message={}", e.status_code, e.status_message)
            });
            return Err(CatalogError::Upstream {
                path: String::from(path),
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|source| CatalogError::Request {
                path: String::from(path),
                source,
            })?;
        let parsed = serde_json::from_str(&body).map_err(|source| {
            CatalogError::MalformedResponse {
                path: String::from(path),
                source,
            }
        })?;
        Ok(parsed)
    }

    /// Converts region offers into providers for the kinds `media` reads.
    fn providers_for(&self, media: MediaType, response: &WatchProvidersResponse) -> Vec<Provider> {
        let Some(region) = response.results.get(&self.region) else {
            return Vec::new();
        };
        media
            .offer_kinds()
            .iter()
            .flat_map(|&kind| region.offers(kind))
            .map(|entry| Provider {
                name: entry.provider_name.clone(),
                logo_url: self.images.resolve(&entry.logo_path),
            })
            .collect()
    }
}

impl LocalCatalogApi for TmdbClient {
    #[instrument(skip_all, fields(media = %media, page = page))]
    async fn discover_page(&self, media: MediaType, page: u32) -> Result<Vec<CatalogItem>> {
        let path = format!("discover/{}", media.path_segment());
        let mut query = self.discover.to_pairs(page);
        if let Some(ref key) = self.api_key {
            query.push(("api_key", key.clone()));
        }

        let response: DiscoverResponse = self.get_json(&path, &query).await?;
        Ok(response.results)
    }

    #[instrument(skip_all, fields(media = %media, id = id))]
    async fn watch_providers(&self, media: MediaType, id: u64) -> Result<Vec<Provider>> {
        let path = format!("{}/{id}/watch/providers", media.path_segment());
        let response: WatchProvidersResponse = self.get_json(&path, &[]).await?;
        Ok(self.providers_for(media, &response))
    }
}
