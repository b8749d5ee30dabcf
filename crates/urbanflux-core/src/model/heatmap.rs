use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Nature;

/// Aggregate statistics for one occupied hex cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub cell_index: String,
    pub center_lat: f64,
    pub center_lng: f64,
    pub avg_intensity: f64,
    pub max_intensity: f64,
    pub place_count: u32,
    pub dominant_nature: Nature,
    pub computed_at: DateTime<Utc>,
}
