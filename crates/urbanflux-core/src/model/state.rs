use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Certainty, Nature};

/// Derived per-location summary. Recomputed wholesale on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationState {
    pub location_id: i64,
    pub certainty: Certainty,
    /// Bounded to `[0, 100]`.
    pub intensity: f64,
    pub nature: Nature,
    pub computed_at: DateTime<Utc>,
}
