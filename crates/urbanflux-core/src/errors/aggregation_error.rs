//! Heatmap aggregation errors. Always fatal for the aggregation phase.

use super::error_code::{self, UrbanfluxErrorCode};
use super::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum AggregationError {
    #[error("aggregation storage failure: {0}")]
    Storage(#[from] StorageError),

    #[error("location {location_id} has out-of-range coordinates ({latitude}, {longitude})")]
    InvalidCoordinate {
        location_id: i64,
        latitude: f64,
        longitude: f64,
    },

    #[error("unsupported hex resolution {resolution}")]
    UnsupportedResolution { resolution: u8 },
}

impl UrbanfluxErrorCode for AggregationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(e) => e.error_code(),
            Self::InvalidCoordinate { .. } | Self::UnsupportedResolution { .. } => {
                error_code::AGGREGATION_FAILED
            }
        }
    }
}
