//! Open-data feed errors. The sync loop converts all of these into a failed
//! page; they never abort a whole ingestion job.

use super::error_code::{self, UrbanfluxErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request to {source_name} failed: {message}")]
    Request {
        source_name: String,
        message: String,
    },

    #[error("request to {source_name} timed out after {seconds}s")]
    Timeout { source_name: String, seconds: u64 },

    #[error("{source_name} returned HTTP {status}: {body}")]
    HttpStatus {
        source_name: String,
        status: u16,
        body: String,
    },

    #[error("could not decode {source_name} response: {message}")]
    Decode {
        source_name: String,
        message: String,
    },

    #[error("sync cancelled")]
    Cancelled,
}

impl UrbanfluxErrorCode for SourceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Request { .. } => error_code::FETCH_FAILED,
            Self::Timeout { .. } => error_code::TIMEOUT,
            Self::HttpStatus { .. } => error_code::HTTP_STATUS,
            Self::Decode { .. } => error_code::DECODE_FAILED,
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}
