//! Fan-out geosearch over a ring of coordinates.
//!
//! One task per ring coordinate runs the geosearch; every summary it finds
//! is handed to the resolver in its own task as soon as the response is
//! parsed. A failing coordinate only loses its own results.

use std::sync::Arc;

use common::{Coordinate, PoiSummary};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, warn};

use crate::resolver::DetailResolver;
use crate::source::PoiSource;

#[derive(Clone)]
pub struct SearchDispatcher {
    source: Arc<dyn PoiSource>,
    resolver: Arc<DetailResolver>,
}

impl SearchDispatcher {
    pub fn new(source: Arc<dyn PoiSource>, resolver: Arc<DetailResolver>) -> Self {
        Self { source, resolver }
    }

    #[cfg(test)]
    pub(crate) fn resolver(&self) -> &Arc<DetailResolver> {
        &self.resolver
    }

    /// Geosearch around one coordinate. Upstream failures are logged and
    /// yield no summaries.
    pub async fn search(&self, at: Coordinate) -> Vec<PoiSummary> {
        match self.source.geosearch(at).await {
            Ok(summaries) => {
                debug!("POIs received around {}: {}", at, summaries.len());
                summaries
            }
            Err(e) => {
                warn!("Geosearch around {} failed: {}", at, e);
                Vec::new()
            }
        }
    }

    /// Spawn one search per coordinate.
    ///
    /// Each handle yields the number of records its search ended up
    /// publishing. Dropping the handles detaches the work.
    pub fn dispatch(&self, ring: &[Coordinate]) -> Vec<JoinHandle<usize>> {
        ring.iter()
            .map(|&at| {
                let this = self.clone();
                tokio::spawn(async move { this.search_and_resolve(at).await })
            })
            .collect()
    }

    async fn search_and_resolve(&self, at: Coordinate) -> usize {
        let summaries = self.search(at).await;

        let mut tasks = JoinSet::new();
        for summary in summaries {
            let resolver = self.resolver.clone();
            tasks.spawn(async move { resolver.resolve(summary).await.is_some() });
        }

        let mut published = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(true) => published += 1,
                Ok(false) => {}
                Err(e) => warn!("Resolve task around {} aborted: {}", at, e),
            }
        }

        debug!("Search around {} published {} POIs", at, published);
        published
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::ring;
    use crate::testing::{summary, FakeSource, RecordingPublisher};

    const TEMPLATE: &str = "https://en.wikipedia.org/wiki?curid={id}";

    fn make_dispatcher(source: FakeSource) -> (SearchDispatcher, Arc<FakeSource>, Arc<RecordingPublisher>) {
        let source = Arc::new(source);
        let publisher = Arc::new(RecordingPublisher::new());
        let resolver = Arc::new(DetailResolver::new(source.clone(), publisher.clone(), TEMPLATE));
        (SearchDispatcher::new(source.clone(), resolver), source, publisher)
    }

    async fn join_all(handles: Vec<JoinHandle<usize>>) -> usize {
        let mut total = 0;
        for handle in handles {
            total += handle.await.expect("search task panicked");
        }
        total
    }

    #[tokio::test]
    async fn test_search_failure_yields_nothing() {
        let at = Coordinate::new(1.0, 1.0);
        let (dispatcher, _, _) = make_dispatcher(FakeSource::new().failing_at(at));

        assert!(dispatcher.search(at).await.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_one_search_per_coordinate() {
        let center = Coordinate::new(47.6062, -122.3321);
        let points = ring(center, 20.0);
        let (dispatcher, source, publisher) = make_dispatcher(FakeSource::new());

        let published = join_all(dispatcher.dispatch(&points)).await;

        assert_eq!(published, 0);
        assert_eq!(source.geosearch_calls(), 9);
        assert!(publisher.records().is_empty());
    }

    #[tokio::test]
    async fn test_failing_coordinate_does_not_abort_batch() {
        let center = Coordinate::new(0.0, 0.0);
        let points = ring(center, 20.0);
        let source = FakeSource::new()
            .failing_at(points[1])
            .with_hits(points[0], vec![summary(1, 0.0, 0.0)])
            .with_hits(points[4], vec![summary(2, 0.1, -0.1), summary(3, 0.2, -0.2)])
            .with_details(1, "One", "")
            .with_details(2, "Two", "")
            .with_details(3, "Three", "");
        let (dispatcher, _, publisher) = make_dispatcher(source);

        let published = join_all(dispatcher.dispatch(&points)).await;

        assert_eq!(published, 3);
        let mut ids: Vec<u64> = publisher.records().iter().map(|r| r.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_unresolvable_summary_is_skipped() {
        let at = Coordinate::new(5.0, 5.0);
        let source = FakeSource::new()
            .with_hits(at, vec![summary(1, 5.0, 5.0), summary(2, 5.0, 5.0)])
            .with_details(1, "Known", "");
        let (dispatcher, _, publisher) = make_dispatcher(source);

        let published = join_all(dispatcher.dispatch(&[at])).await;

        assert_eq!(published, 1);
        assert_eq!(publisher.records()[0].id, 1);
        assert!(dispatcher.resolver().cached(2).is_none());
    }

    #[tokio::test]
    async fn test_overlapping_hits_publish_identical_records() {
        let points = ring(Coordinate::new(10.0, 10.0), 20.0);
        let shared = summary(77, 10.05, 10.05);
        let source = FakeSource::new()
            .with_hits(points[0], vec![shared])
            .with_hits(points[7], vec![shared])
            .with_hits(points[8], vec![shared])
            .with_details(77, "Reef", "Shallow reef.");
        let (dispatcher, source, publisher) = make_dispatcher(source);

        let published = join_all(dispatcher.dispatch(&points)).await;

        assert_eq!(published, 3);
        let records = publisher.records();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| *r == records[0]));
        assert!(source.detail_calls() >= 1 && source.detail_calls() <= 3);
        assert_eq!(dispatcher.resolver().cache_len(), 1);
    }
}
