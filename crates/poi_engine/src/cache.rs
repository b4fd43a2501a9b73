//! Write-once detail cache keyed by POI id.
//!
//! Backed by `DashMap` so concurrent resolvers can read and insert without a
//! global lock. Entries live for the whole process: nothing is evicted,
//! refreshed, or persisted.

use common::PoiRecord;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct DetailCache {
    entries: DashMap<u64, PoiRecord>,
}

impl DetailCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: u64) -> Option<PoiRecord> {
        self.entries.get(&id).map(|entry| entry.value().clone())
    }

    /// Store `record` unless its id is already cached, and return whichever
    /// record the cache holds afterwards. The first complete write for an id
    /// is kept for good.
    pub fn insert_or_existing(&self, record: PoiRecord) -> PoiRecord {
        self.entries
            .entry(record.id)
            .or_insert(record)
            .value()
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
