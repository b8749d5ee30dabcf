//! Pipeline errors: aggregates subsystem errors via `From` conversions.

use super::error_code::{self, UrbanfluxErrorCode};
use super::{AggregationError, ConfigError, SourceError, StorageError, TransformationError};

/// Errors that end a pipeline job.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Transformation error: {0}")]
    Transformation(#[from] TransformationError),

    #[error("Aggregation error: {0}")]
    Aggregation(#[from] AggregationError),

    #[error("Pipeline cancelled")]
    Cancelled,
}

impl UrbanfluxErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Source(e) => e.error_code(),
            Self::Transformation(e) => e.error_code(),
            Self::Aggregation(e) => e.error_code(),
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}
