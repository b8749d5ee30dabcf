use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EventType, Source};

/// A normalized record of one change-relevant occurrence.
///
/// Identity is `(source, source_id)`; the store upserts on that key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    pub source: Source,
    /// Identifier of the record within its source.
    pub source_id: String,
    pub event_type: EventType,
    /// Never null: records without a usable date are rejected upstream.
    pub event_date: DateTime<Utc>,
    /// Stable place key (a BBL for most feeds).
    pub location_ref: Option<String>,
    /// Canonical borough name, or the raw token for pass-through sources.
    pub borough: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub community_district: Option<String>,
    /// The untouched source record.
    pub raw_payload: serde_json::Value,
}

impl CanonicalEvent {
    /// Both coordinates, or nothing.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Neighborhood tabulation area carried in the raw payload, if any.
    pub fn nta(&self) -> Option<&str> {
        ["nta", "nta2020", "gis_nta_name", "ntaname"]
            .iter()
            .find_map(|key| self.raw_payload.get(*key).and_then(|v| v.as_str()))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// An event as read back from the store for derivation.
///
/// `event_type` stays textual so one corrupt row fails only its own location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub id: i64,
    pub source: String,
    pub source_id: String,
    pub event_type: String,
    pub event_date: DateTime<Utc>,
}
