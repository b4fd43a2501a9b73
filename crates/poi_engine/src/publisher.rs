//! Hand-off of resolved POIs to the host bus.

use chrono::{DateTime, Utc};
use common::config::WatchConfig;
use common::{Delta, DeltaSource, DeltaUpdate, PathValue, PoiRecord, PoiValue};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Sink for resolved POIs. Publishing never fails from the caller's view;
/// delivery problems belong to the host side.
pub trait Publisher: Send + Sync {
    fn publish(&self, record: &PoiRecord);
}

/// Bus key for a POI: `<namespace>.<id>`.
pub fn poi_path(namespace: &str, id: u64) -> String {
    format!("{namespace}.{id}")
}

/// Wrap one record in a single-value delta.
pub fn build_delta(
    namespace: &str,
    source_label: &str,
    record: &PoiRecord,
    timestamp: DateTime<Utc>,
) -> Delta {
    Delta {
        updates: vec![DeltaUpdate {
            source: DeltaSource {
                label: source_label.to_string(),
            },
            timestamp,
            values: vec![PathValue {
                path: poi_path(namespace, record.id),
                value: PoiValue::from(record),
            }],
        }],
    }
}

/// Publishes deltas over an unbounded channel drained by the host adapter.
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    namespace: String,
    source_label: String,
    tx: mpsc::UnboundedSender<Delta>,
}

impl ChannelPublisher {
    pub fn new(cfg: &WatchConfig) -> (Self, mpsc::UnboundedReceiver<Delta>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let publisher = Self {
            namespace: cfg.namespace.clone(),
            source_label: cfg.source_label.clone(),
            tx,
        };
        (publisher, rx)
    }
}

impl Publisher for ChannelPublisher {
    fn publish(&self, record: &PoiRecord) {
        let delta = build_delta(&self.namespace, &self.source_label, record, Utc::now());
        if self.tx.send(delta).is_err() {
            warn!("Host bus closed, dropping POI {}", record.id);
            return;
        }
        debug!("Published POI {} ({})", record.id, record.name);
    }
}
