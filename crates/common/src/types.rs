//! Domain types shared across the workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Geography ─────────────────────────────────────────────────────────

/// A position on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

// ── Points of Interest ────────────────────────────────────────────────

/// One geosearch hit. Deserialized straight from the upstream entry;
/// fields other than id and coordinates are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PoiSummary {
    #[serde(rename = "pageid")]
    pub page_id: u64,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl PoiSummary {
    pub fn position(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Descriptive text returned by a detail fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDetails {
    pub title: String,
    /// Intro extract, may contain HTML.
    pub extract: String,
}

/// A resolved point of interest. Never modified once cached.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiRecord {
    pub id: u64,
    pub name: String,
    pub position: Coordinate,
    pub notes: String,
    pub url: String,
}

// ── Outbound deltas ───────────────────────────────────────────────────

/// Value published for a single POI path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoiValue {
    pub name: String,
    pub position: Coordinate,
    pub notes: String,
    /// Always empty: the upstream has no POI taxonomy.
    #[serde(rename = "type")]
    pub poi_type: String,
    pub url: String,
}

impl From<&PoiRecord> for PoiValue {
    fn from(record: &PoiRecord) -> Self {
        Self {
            name: record.name.clone(),
            position: record.position,
            notes: record.notes.clone(),
            poi_type: String::new(),
            url: record.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathValue {
    pub path: String,
    pub value: PoiValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaSource {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaUpdate {
    pub source: DeltaSource,
    pub timestamp: DateTime<Utc>,
    pub values: Vec<PathValue>,
}

/// Message handed to the host bus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delta {
    pub updates: Vec<DeltaUpdate>,
}
