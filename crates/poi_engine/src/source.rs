//! Upstream seam for geosearch and detail lookups.

use async_trait::async_trait;
use common::{Coordinate, PageDetails, PoiSummary, Result};
use wikipedia_client::WikipediaClient;

/// Anything that can find POIs near a coordinate and describe one by id.
#[async_trait]
pub trait PoiSource: Send + Sync {
    /// POI summaries near `at`. An empty list is a valid answer.
    async fn geosearch(&self, at: Coordinate) -> Result<Vec<PoiSummary>>;

    /// Descriptive text for one POI.
    async fn fetch_details(&self, page_id: u64) -> Result<PageDetails>;
}

#[async_trait]
impl PoiSource for WikipediaClient {
    async fn geosearch(&self, at: Coordinate) -> Result<Vec<PoiSummary>> {
        WikipediaClient::geosearch(self, at).await
    }

    async fn fetch_details(&self, page_id: u64) -> Result<PageDetails> {
        WikipediaClient::fetch_details(self, page_id).await
    }
}
