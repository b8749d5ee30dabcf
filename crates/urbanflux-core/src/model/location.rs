use serde::{Deserialize, Serialize};

use super::{Nature, StoredEvent};

/// A place events attach to. Events reference it; it owns no collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub location_ref: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub borough: Option<String>,
    pub community_district: Option<String>,
    pub nta: Option<String>,
}

impl Location {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// One location with every event currently linked to it.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationEvents {
    pub location: Location,
    pub events: Vec<StoredEvent>,
}

/// Input row for spatial aggregation: a geocoded location and its state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedState {
    pub location_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub intensity: f64,
    pub nature: Nature,
}
