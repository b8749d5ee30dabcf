//! Per-location transformation failures. Isolated to one location.

use super::error_code::{self, UrbanfluxErrorCode};
use super::{ModelError, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum TransformationError {
    #[error("location {location_id}: {source}")]
    InvalidEvent {
        location_id: i64,
        #[source]
        source: ModelError,
    },

    #[error("location {location_id}: state write failed: {source}")]
    WriteFailed {
        location_id: i64,
        #[source]
        source: StorageError,
    },
}

impl TransformationError {
    pub fn location_id(&self) -> i64 {
        match self {
            Self::InvalidEvent { location_id, .. } | Self::WriteFailed { location_id, .. } => {
                *location_id
            }
        }
    }
}

impl UrbanfluxErrorCode for TransformationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidEvent { .. } => error_code::UNKNOWN_EVENT_TYPE,
            Self::WriteFailed { source, .. } => source.error_code(),
        }
    }
}
