//! Detail resolution with a write-once cache.
//!
//! Every summary handed to [`DetailResolver::resolve`] yields at most one
//! published record. Known ids are answered from the cache; unknown ids cost
//! one upstream detail fetch. Failed fetches are not remembered, so the id
//! is simply retried when a later cycle sees it again.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use common::config::{article_url, WatchConfig};
use common::{PoiRecord, PoiSummary};
use tracing::{debug, warn};

use crate::cache::DetailCache;
use crate::publisher::Publisher;
use crate::source::PoiSource;

/// Running counters for the heartbeat.
#[derive(Debug, Default)]
pub struct ResolverStats {
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    fetch_failures: AtomicU64,
    published: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub fetch_failures: u64,
    pub published: u64,
}

impl ResolverStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            published: self.published.load(Ordering::Relaxed),
        }
    }
}

/// Owns the detail cache; nothing else reads or writes it.
pub struct DetailResolver {
    source: Arc<dyn PoiSource>,
    publisher: Arc<dyn Publisher>,
    cache: DetailCache,
    article_url_template: String,
    stats: ResolverStats,
}

impl DetailResolver {
    pub fn new(
        source: Arc<dyn PoiSource>,
        publisher: Arc<dyn Publisher>,
        article_url_template: impl Into<String>,
    ) -> Self {
        Self {
            source,
            publisher,
            cache: DetailCache::new(),
            article_url_template: article_url_template.into(),
            stats: ResolverStats::default(),
        }
    }

    pub fn from_config(
        source: Arc<dyn PoiSource>,
        publisher: Arc<dyn Publisher>,
        cfg: &WatchConfig,
    ) -> Self {
        Self::new(source, publisher, cfg.article_url_template.clone())
    }

    /// Publish the record for `summary.page_id`, fetching it first if needed.
    ///
    /// Returns the published record, or `None` when the detail fetch failed.
    pub async fn resolve(&self, summary: PoiSummary) -> Option<PoiRecord> {
        let page_id = summary.page_id;

        if let Some(record) = self.cache.get(page_id) {
            debug!("POI {} already known, using cached details", page_id);
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            self.emit(&record);
            return Some(record);
        }

        debug!("Retrieving details for POI {}", page_id);
        self.stats.cache_misses.fetch_add(1, Ordering::Relaxed);

        let details = match self.source.fetch_details(page_id).await {
            Ok(details) => details,
            Err(e) => {
                warn!("Detail fetch for POI {} failed: {}", page_id, e);
                self.stats.fetch_failures.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        let fetched = PoiRecord {
            id: page_id,
            name: details.title,
            position: summary.position(),
            notes: details.extract,
            url: article_url(&self.article_url_template, page_id),
        };

        // A concurrent resolver may have cached this id meanwhile; publish
        // whatever the cache holds so both emit the same record.
        let record = self.cache.insert_or_existing(fetched);
        self.emit(&record);
        debug!("Published details for POI {}", page_id);
        Some(record)
    }

    fn emit(&self, record: &PoiRecord) {
        self.publisher.publish(record);
        self.stats.published.fetch_add(1, Ordering::Relaxed);
    }

    #[cfg(test)]
    pub(crate) fn cached(&self, page_id: u64) -> Option<PoiRecord> {
        self.cache.get(page_id)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}
