//! Paginated collection over the discover feed.
//!
//! Pages are fetched in fixed-size concurrent batches and merged in page
//! order; each item is then enriched with its providers one at a time and
//! kept if it passes the [`FilterCriteria`].

mod filter;
mod item;

use std::num::NonZeroU32;
use std::ops::Range;

use anyhow::{Context, Result};
use futures::future::try_join_all;
use tracing::instrument;

pub use filter::{DEFAULT_MIN_VOTE_COUNT, DEFAULT_YEAR_CEILING, FilterCriteria, release_year};
pub use item::EnrichedItem;

use crate::media::MediaType;
use crate::tmdb::{CatalogItem, ImageBase, LocalCatalogApi};

/// Default number of pages fetched per batch.
pub const DEFAULT_CONCURRENCY: NonZeroU32 = match NonZeroU32::new(5) {
    Some(n) => n,
    None => NonZeroU32::MIN,
};

/// Settings fixed for the lifetime of a [`Collector`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct CollectorConfig {
    /// Pages requested concurrently per batch.
    pub concurrency: NonZeroU32,
    /// Inclusion thresholds.
    pub criteria: FilterCriteria,
    /// Prefix for poster URLs.
    pub images: ImageBase,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            criteria: FilterCriteria::default(),
            images: ImageBase::default(),
        }
    }
}

/// Drives page fetches, provider enrichment and filtering for one catalog.
#[derive(Debug)]
pub struct Collector<'a, A> {
    api: &'a A,
    config: CollectorConfig,
}

impl<'a, A: LocalCatalogApi> Collector<'a, A> {
    /// Creates a collector over `api`.
    #[must_use]
    pub const fn new(api: &'a A, config: CollectorConfig) -> Self {
        Self { api, config }
    }

    /// Collects up to `target` items of `media` that pass the filter.
    ///
    /// Results are ordered by page, then by upstream rank within the page,
    /// regardless of which page request finished first. Returns fewer than
    /// `target` items when an empty page is seen first.
    ///
    /// # Errors
    ///
    /// Returns an error naming the page or item id if any page fetch or
    /// provider lookup fails. Nothing collected so far is returned.
    #[instrument(skip_all, fields(media = %media, target_count = target))]
    pub async fn collect(&self, media: MediaType, target: usize) -> Result<Vec<EnrichedItem>> {
        let concurrency = self.config.concurrency.get();
        let mut items: Vec<EnrichedItem> = Vec::new();
        let mut next_page: u32 = 1;
        let mut exhausted = false;

        'batches: while items.len() < target && !exhausted {
            // Claim the whole window before any result is known.
            let first = next_page;
            next_page = next_page
                .checked_add(concurrency)
                .context("page cursor overflow")?;

            let pages = self.fetch_batch(media, first..next_page).await?;

            for (page, results) in pages {
                if results.is_empty() {
                    tracing::debug!(page, "empty page, feed exhausted");
                    exhausted = true;
                    continue;
                }

                for raw in results {
                    let item = self.enrich(media, raw).await?;
                    if self.config.criteria.accepts(&item) {
                        items.push(item);
                    }
                    if items.len() >= target {
                        tracing::info!(page, collected = items.len(), "target reached");
                        break 'batches;
                    }
                }

                tracing::info!(
                    page,
                    collected = items.len(),
                    "Fetched {} {media} items so far",
                    items.len()
                );
            }
        }

        items.truncate(target);
        tracing::info!(
            collected = items.len(),
            pages_claimed = next_page.saturating_sub(1),
            exhausted,
            "{media} collection completed"
        );

        Ok(items)
    }

    /// Fetches every page in `pages` concurrently, returned in page order.
    ///
    /// The first failure drops the rest of the batch.
    async fn fetch_batch(
        &self,
        media: MediaType,
        pages: Range<u32>,
    ) -> Result<Vec<(u32, Vec<CatalogItem>)>> {
        tracing::debug!(first = pages.start, end = pages.end, "dispatching page batch");

        let fetches = pages.map(|page| async move {
            let results = self
                .api
                .discover_page(media, page)
                .await
                .with_context(|| format!("failed to fetch {media} page {page}"))?;
            Ok::<_, anyhow::Error>((page, results))
        });

        try_join_all(fetches).await
    }

    /// Looks up providers for one item and builds its enriched form.
    async fn enrich(&self, media: MediaType, raw: CatalogItem) -> Result<EnrichedItem> {
        let id = raw.id;
        let providers = self
            .api
            .watch_providers(media, id)
            .await
            .with_context(|| format!("failed to fetch watch providers for {media} {id}"))?;
        Ok(EnrichedItem::new(media, raw, &self.config.images, providers))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use std::time::Duration;

    use anyhow::Result;

    use super::*;
    use crate::error::CatalogError;
    use crate::tmdb::Provider;

    /// In-memory catalog. Pages not listed are empty.
    #[derive(Default)]
    struct MockCatalog {
        pages: HashMap<u32, Vec<CatalogItem>>,
        delays: HashMap<u32, Duration>,
        failing_pages: HashSet<u32>,
        failing_items: HashSet<u64>,
        providers: HashMap<u64, Vec<Provider>>,
        page_calls: Mutex<Vec<u32>>,
        provider_calls: Mutex<Vec<u64>>,
    }

    impl MockCatalog {
        fn with_pages(pages: Vec<(u32, Vec<CatalogItem>)>) -> Self {
            Self {
                pages: pages.into_iter().collect(),
                ..Self::default()
            }
        }

        fn page_calls(&self) -> Vec<u32> {
            let mut calls = self.page_calls.lock().unwrap().clone();
            calls.sort_unstable();
            calls
        }

        fn provider_calls(&self) -> Vec<u64> {
            self.provider_calls.lock().unwrap().clone()
        }
    }

    impl LocalCatalogApi for MockCatalog {
        async fn discover_page(&self, _media: MediaType, page: u32) -> Result<Vec<CatalogItem>> {
            self.page_calls.lock().unwrap().push(page);
            if let Some(delay) = self.delays.get(&page) {
                tokio::time::sleep(*delay).await;
            }
            if self.failing_pages.contains(&page) {
                return Err(CatalogError::Upstream {
                    path: String::from("discover/movie"),
                    status: 500,
                    message: String::from("boom"),
                }
                .into());
            }
            Ok(self.pages.get(&page).cloned().unwrap_or_default())
        }

        async fn watch_providers(&self, _media: MediaType, id: u64) -> Result<Vec<Provider>> {
            self.provider_calls.lock().unwrap().push(id);
            if self.failing_items.contains(&id) {
                return Err(CatalogError::Upstream {
                    path: format!("movie/{id}/watch/providers"),
                    status: 404,
                    message: String::from("not found"),
                }
                .into());
            }
            Ok(self.providers.get(&id).cloned().unwrap_or_default())
        }
    }

    fn item(id: u64, date: Option<&str>, poster: Option<&str>, votes: Option<u32>) -> CatalogItem {
        CatalogItem {
            id,
            title: format!("Item {id}"),
            overview: String::new(),
            poster_path: poster.map(String::from),
            release_date: date.map(String::from),
            vote_count: votes,
        }
    }

    /// An item that passes every default predicate.
    fn good(id: u64) -> CatalogItem {
        item(id, Some("2010-05-05"), Some("/p.jpg"), Some(1_000))
    }

    fn page_of(ids: std::ops::Range<u64>) -> Vec<CatalogItem> {
        ids.map(good).collect()
    }

    fn config(concurrency: u32) -> CollectorConfig {
        CollectorConfig {
            concurrency: NonZeroU32::new(concurrency).unwrap(),
            ..CollectorConfig::default()
        }
    }

    fn ids(items: &[EnrichedItem]) -> Vec<u64> {
        items.iter().map(|i| i.id).collect()
    }

    #[tokio::test]
    async fn test_collect_returns_exactly_target() {
        // Arrange
        let mock = MockCatalog::with_pages(vec![
            (1, page_of(1..21)),
            (2, page_of(21..41)),
            (3, page_of(41..61)),
        ]);
        let collector = Collector::new(&mock, config(2));

        // Act
        let items = collector.collect(MediaType::Movie, 25).await.unwrap();

        // Assert
        assert_eq!(items.len(), 25);
        assert_eq!(ids(&items), (1..26).collect::<Vec<u64>>());
        let criteria = FilterCriteria::default();
        assert!(items.iter().all(|i| criteria.accepts(i)));
    }

    #[tokio::test]
    async fn test_collect_stops_enriching_at_target() {
        // Arrange
        let mock = MockCatalog::with_pages(vec![(1, page_of(1..21))]);
        let collector = Collector::new(&mock, config(5));

        // Act
        let items = collector.collect(MediaType::Movie, 3).await.unwrap();

        // Assert: the whole first window is claimed, but enrichment stops at 3
        assert_eq!(ids(&items), vec![1, 2, 3]);
        assert_eq!(mock.page_calls(), vec![1, 2, 3, 4, 5]);
        assert_eq!(mock.provider_calls(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_collect_order_ignores_completion_order() {
        // Arrange: later pages finish first
        let mut mock = MockCatalog::with_pages(vec![
            (1, page_of(1..4)),
            (2, page_of(4..7)),
            (3, page_of(7..10)),
        ]);
        mock.delays.insert(1, Duration::from_millis(60));
        mock.delays.insert(2, Duration::from_millis(30));
        let collector = Collector::new(&mock, config(3));

        // Act
        let items = collector.collect(MediaType::Series, 9).await.unwrap();

        // Assert
        assert_eq!(ids(&items), (1..10).collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn test_collect_exhausted_returns_fewer_without_error() {
        // Arrange: page 3 onward is empty
        let mock = MockCatalog::with_pages(vec![(1, page_of(1..4)), (2, page_of(4..6))]);
        let collector = Collector::new(&mock, config(2));

        // Act
        let items = collector.collect(MediaType::Movie, 100).await.unwrap();

        // Assert: batch [1,2] then batch [3,4] sees the empty page and stops
        assert_eq!(ids(&items), vec![1, 2, 3, 4, 5]);
        assert_eq!(mock.page_calls(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_collect_processes_rest_of_batch_after_empty_page() {
        // Arrange: an empty page in the middle of the batch
        let mock = MockCatalog::with_pages(vec![(1, page_of(1..3)), (3, page_of(3..5))]);
        let collector = Collector::new(&mock, config(3));

        // Act
        let items = collector.collect(MediaType::Movie, 100).await.unwrap();

        // Assert: page 3 still counts, no further batch is dispatched
        assert_eq!(ids(&items), vec![1, 2, 3, 4]);
        assert_eq!(mock.page_calls(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_collect_applies_filter() {
        // Arrange
        let mock = MockCatalog::with_pages(vec![(
            1,
            vec![
                item(1, Some("2026-01-01"), Some("/p.jpg"), Some(5_000)),
                item(2, Some("2025-12-31"), Some("/p.jpg"), Some(5_000)),
                item(3, None, Some("/p.jpg"), Some(5_000)),
                item(4, Some("2001-01-01"), Some("/p.jpg"), Some(700)),
                item(5, Some("2001-01-01"), Some("/p.jpg"), Some(701)),
                item(6, Some("2001-01-01"), None, Some(5_000)),
                item(7, Some("2001-01-01"), Some(""), Some(5_000)),
                item(8, Some("2001-01-01"), Some("/p.jpg"), None),
            ],
        )]);
        let collector = Collector::new(&mock, config(1));

        // Act
        let items = collector.collect(MediaType::Movie, 10).await.unwrap();

        // Assert
        assert_eq!(ids(&items), vec![2, 5]);
        assert_eq!(
            items[0].poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/p.jpg")
        );
    }

    #[tokio::test]
    async fn test_collect_enriches_rejected_items_too() {
        // Arrange
        let mock = MockCatalog::with_pages(vec![(
            1,
            vec![item(1, None, None, None), good(2)],
        )]);
        let collector = Collector::new(&mock, config(1));

        // Act
        let items = collector.collect(MediaType::Movie, 1).await.unwrap();

        // Assert
        assert_eq!(ids(&items), vec![2]);
        assert_eq!(mock.provider_calls(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_collect_attaches_providers() {
        // Arrange
        let mut mock = MockCatalog::with_pages(vec![(1, page_of(1..3))]);
        mock.providers.insert(
            2,
            vec![Provider {
                name: String::from("Netflix"),
                logo_url: String::from("https://img/n.jpg"),
            }],
        );
        let collector = Collector::new(&mock, config(1));

        // Act
        let items = collector.collect(MediaType::Movie, 2).await.unwrap();

        // Assert
        assert!(items[0].providers.is_empty());
        assert_eq!(items[1].providers[0].name, "Netflix");
    }

    #[tokio::test]
    async fn test_collect_page_failure_fails_whole_batch() {
        // Arrange: page 1 has qualifying items, page 2 fails
        let mut mock = MockCatalog::with_pages(vec![(1, page_of(1..21)), (3, page_of(21..41))]);
        mock.failing_pages.insert(2);
        let collector = Collector::new(&mock, config(3));

        // Act
        let err = collector.collect(MediaType::Movie, 5).await.unwrap_err();

        // Assert
        assert!(err.to_string().contains("page 2"));
        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::Upstream { status: 500, .. })
        ));
        assert!(mock.provider_calls().is_empty());
    }

    #[tokio::test]
    async fn test_collect_failure_in_later_batch_discards_earlier_items() {
        // Arrange
        let mut mock = MockCatalog::with_pages(vec![(1, page_of(1..3)), (2, page_of(3..5))]);
        mock.failing_pages.insert(3);
        let collector = Collector::new(&mock, config(2));

        // Act
        let result = collector.collect(MediaType::Movie, 10).await;

        // Assert: pages 1 and 2 were fully enriched before page 3 failed
        let err = result.unwrap_err();
        assert!(err.to_string().contains("movie page 3"));
        assert_eq!(mock.provider_calls(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_collect_provider_failure_names_item() {
        // Arrange
        let mut mock = MockCatalog::with_pages(vec![(1, page_of(1..4))]);
        mock.failing_items.insert(2);
        let collector = Collector::new(&mock, config(1));

        // Act
        let err = collector.collect(MediaType::Series, 3).await.unwrap_err();

        // Assert
        assert!(err.to_string().contains("series 2"));
        assert_eq!(err.downcast_ref::<CatalogError>().unwrap().status(), Some(404));
    }

    #[tokio::test]
    async fn test_collect_zero_target_fetches_nothing() {
        // Arrange
        let mock = MockCatalog::with_pages(vec![(1, page_of(1..4))]);
        let collector = Collector::new(&mock, config(5));

        // Act
        let items = collector.collect(MediaType::Movie, 0).await.unwrap();

        // Assert
        assert!(items.is_empty());
        assert!(mock.page_calls().is_empty());
    }

    #[tokio::test]
    async fn test_collect_fetches_each_item_once() {
        // Arrange
        let mock = MockCatalog::with_pages(vec![
            (1, page_of(1..6)),
            (2, page_of(6..11)),
            (3, page_of(11..16)),
            (4, page_of(16..21)),
        ]);
        let collector = Collector::new(&mock, config(2));

        // Act
        let items = collector.collect(MediaType::Movie, 18).await.unwrap();

        // Assert
        let calls = mock.provider_calls();
        let unique: HashSet<u64> = calls.iter().copied().collect();
        assert_eq!(items.len(), 18);
        assert_eq!(unique.len(), calls.len());
        assert_eq!(mock.page_calls(), vec![1, 2, 3, 4]);
    }
}
