//! CLI errors and their exit codes.

use thiserror::Error;
use urbanflux_core::errors::{ConfigError, PipelineError, SourceError, StorageError};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    /// The command ran to the end but some sources did not finish syncing.
    #[error("Partial ingestion: incomplete sources: {sources}")]
    PartialIngestion { sources: String },
}

pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub fn invalid_arg(message: impl Into<String>) -> Self {
        CliError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::InvalidArgument { .. } => 2,
            CliError::Pipeline(PipelineError::Config(_)) => 2,
            CliError::PartialIngestion { .. } => 3,
            CliError::Io(_)
            | CliError::Storage(_)
            | CliError::Source(_)
            | CliError::Pipeline(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_exit_with_two() {
        let err = CliError::from(ConfigError::UnknownSource {
            name: "weather".to_string(),
        });
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("weather"));
        assert_eq!(CliError::invalid_arg("bad").exit_code(), 2);
    }

    #[test]
    fn partial_ingestion_exits_with_three() {
        let err = CliError::PartialIngestion {
            sources: "dob_permits".to_string(),
        };
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn pipeline_failures_are_fatal() {
        assert_eq!(CliError::from(PipelineError::Cancelled).exit_code(), 1);
        assert_eq!(CliError::from(StorageError::sqlite("disk I/O error")).exit_code(), 1);
    }
}
