//! Error handling for Urbanflux.
//! One error enum per subsystem, `thiserror` only.

pub mod aggregation_error;
pub mod config_error;
pub mod error_code;
pub mod model_error;
pub mod pipeline_error;
pub mod source_error;
pub mod storage_error;
pub mod transformation_error;

pub use aggregation_error::AggregationError;
pub use config_error::ConfigError;
pub use error_code::UrbanfluxErrorCode;
pub use model_error::ModelError;
pub use pipeline_error::PipelineError;
pub use source_error::SourceError;
pub use storage_error::StorageError;
pub use transformation_error::TransformationError;
