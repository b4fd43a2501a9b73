//! In-memory upstream and bus doubles for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use common::{Coordinate, Error, PageDetails, PoiRecord, PoiSummary, Result};

use crate::publisher::Publisher;
use crate::source::PoiSource;

/// Scripted upstream. Coordinates are matched exactly; anything unscripted
/// returns no hits, and unknown page ids fail like a malformed response.
#[derive(Default)]
pub struct FakeSource {
    hits: Vec<(Coordinate, Vec<PoiSummary>)>,
    failing: Vec<Coordinate>,
    details: HashMap<u64, PageDetails>,
    detail_delay: Option<Duration>,
    geosearch_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hits(mut self, at: Coordinate, hits: Vec<PoiSummary>) -> Self {
        self.hits.push((at, hits));
        self
    }

    pub fn failing_at(mut self, at: Coordinate) -> Self {
        self.failing.push(at);
        self
    }

    pub fn with_details(mut self, page_id: u64, title: &str, extract: &str) -> Self {
        self.details.insert(
            page_id,
            PageDetails {
                title: title.into(),
                extract: extract.into(),
            },
        );
        self
    }

    pub fn with_detail_delay(mut self, delay: Duration) -> Self {
        self.detail_delay = Some(delay);
        self
    }

    pub fn geosearch_calls(&self) -> usize {
        self.geosearch_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PoiSource for FakeSource {
    async fn geosearch(&self, at: Coordinate) -> Result<Vec<PoiSummary>> {
        self.geosearch_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&at) {
            return Err(Error::UpstreamStatus {
                status: 503,
                message: "scripted failure".into(),
            });
        }
        Ok(self
            .hits
            .iter()
            .find(|(c, _)| *c == at)
            .map(|(_, hits)| hits.clone())
            .unwrap_or_default())
    }

    async fn fetch_details(&self, page_id: u64) -> Result<PageDetails> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.detail_delay {
            tokio::time::sleep(delay).await;
        }
        self.details
            .get(&page_id)
            .cloned()
            .ok_or_else(|| Error::MalformedResponse(format!("page {page_id} absent")))
    }
}

/// Keeps every published record in order.
#[derive(Default)]
pub struct RecordingPublisher {
    records: Mutex<Vec<PoiRecord>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<PoiRecord> {
        self.records.lock().expect("publisher lock poisoned").clone()
    }
}

impl Publisher for RecordingPublisher {
    fn publish(&self, record: &PoiRecord) {
        self.records
            .lock()
            .expect("publisher lock poisoned")
            .push(record.clone());
    }
}

pub fn summary(page_id: u64, latitude: f64, longitude: f64) -> PoiSummary {
    PoiSummary {
        page_id,
        latitude,
        longitude,
    }
}
