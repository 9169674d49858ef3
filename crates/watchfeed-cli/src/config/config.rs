//! `AppConfig` struct and TOML loading.

use std::ffi::OsString;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;
use watchfeed_api::collector::{
    CollectorConfig, DEFAULT_MIN_VOTE_COUNT, DEFAULT_YEAR_CEILING, FilterCriteria,
};
use watchfeed_api::media::MediaType;
use watchfeed_api::tmdb::{DEFAULT_IMAGE_BASE_URL, DiscoverQuery, ImageBase};

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB connection settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Collection sizes and parallelism.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Inclusion thresholds.
    #[serde(default)]
    pub filter: FilterConfig,
    /// Output file locations.
    #[serde(default)]
    pub output: OutputConfig,
}

/// TMDB connection settings. The bearer token comes from `TMDB_API_TOKEN`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TmdbConfig {
    /// API v3 base URL.
    pub base_url: String,
    /// Optional v3 `api_key` query parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Prefix for poster and logo URLs.
    pub image_base_url: String,
    /// Response language.
    pub language: String,
    /// `with_original_language` discover filter.
    pub original_language: String,
    /// Watch-provider region.
    pub region: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        let query = DiscoverQuery::default();
        Self {
            base_url: String::from("https://api.themoviedb.org/3/"),
            api_key: None,
            image_base_url: String::from(DEFAULT_IMAGE_BASE_URL),
            language: query.language,
            original_language: query.original_language,
            region: String::from("US"),
        }
    }
}

/// Collection sizes and parallelism.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FetchConfig {
    /// Pages fetched concurrently per batch.
    pub concurrency: u32,
    /// Movies to keep.
    pub movie_target: usize,
    /// Series to keep.
    pub series_target: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: 5,
            movie_target: 3_000,
            series_target: 300,
        }
    }
}

/// Inclusion thresholds.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterConfig {
    /// Items need strictly more votes than this.
    pub min_vote_count: u32,
    /// Latest accepted year, compared as a string.
    pub year_ceiling: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_vote_count: DEFAULT_MIN_VOTE_COUNT,
            year_ceiling: String::from(DEFAULT_YEAR_CEILING),
        }
    }
}

/// Output file locations, relative to the working directory unless absolute.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Movie output file.
    pub movies_path: PathBuf,
    /// Series output file.
    pub series_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            movies_path: PathBuf::from("movies.json"),
            series_path: PathBuf::from("tv_shows.json"),
        }
    }
}

/// File name looked up inside the config directory.
const CONFIG_FILE: &str = "config.toml";

impl AppConfig {
    /// Locates `config.toml`.
    ///
    /// `--dir` wins; otherwise `$XDG_CONFIG_HOME/watchfeed`, falling back to
    /// `~/.config/watchfeed`.
    ///
    /// # Errors
    ///
    /// Returns an error if no `--dir` is given and neither `XDG_CONFIG_HOME`
    /// nor `HOME` is set.
    pub fn locate(dir: Option<&Path>) -> Result<PathBuf> {
        config_path_from(
            dir,
            std::env::var_os("XDG_CONFIG_HOME"),
            std::env::var_os("HOME"),
        )
    }

    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Builds the collector settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `fetch.concurrency` is zero.
    pub fn collector_config(&self) -> Result<CollectorConfig> {
        let concurrency =
            NonZeroU32::new(self.fetch.concurrency).context("fetch.concurrency must be at least 1")?;
        Ok(CollectorConfig {
            concurrency,
            criteria: FilterCriteria {
                min_vote_count: self.filter.min_vote_count,
                year_ceiling: self.filter.year_ceiling.clone(),
            },
            images: self.image_base(),
        })
    }

    /// Image base shared by posters and provider logos.
    #[must_use]
    pub fn image_base(&self) -> ImageBase {
        ImageBase::new(self.tmdb.image_base_url.clone())
    }

    /// Discover query parameters.
    #[must_use]
    pub fn discover_query(&self) -> DiscoverQuery {
        DiscoverQuery {
            language: self.tmdb.language.clone(),
            original_language: self.tmdb.original_language.clone(),
            ..DiscoverQuery::default()
        }
    }

    /// Parses the API base URL, adding the trailing `/` that relative joins need.
    ///
    /// # Errors
    ///
    /// Returns an error if `tmdb.base_url` is not a valid URL.
    pub fn base_url(&self) -> Result<Url> {
        let mut raw = self.tmdb.base_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).with_context(|| format!("invalid tmdb.base_url: {}", self.tmdb.base_url))
    }

    /// Configured number of items to keep for `media`.
    #[must_use]
    pub const fn target(&self, media: MediaType) -> usize {
        match media {
            MediaType::Movie => self.fetch.movie_target,
            MediaType::Series => self.fetch.series_target,
        }
    }

    /// Configured output file for `media`.
    #[must_use]
    pub fn output_path(&self, media: MediaType) -> &Path {
        match media {
            MediaType::Movie => &self.output.movies_path,
            MediaType::Series => &self.output.series_path,
        }
    }
}

fn config_path_from(
    dir: Option<&Path>,
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }
    let base = match xdg_config_home.filter(|v| !v.is_empty()) {
        Some(xdg) => PathBuf::from(xdg),
        None => PathBuf::from(home.context("neither XDG_CONFIG_HOME nor HOME is set")?)
            .join(".config"),
    };
    Ok(base.join("watchfeed").join(CONFIG_FILE))
}
