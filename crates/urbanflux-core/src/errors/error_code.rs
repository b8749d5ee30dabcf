//! UrbanfluxErrorCode trait for stable, machine-readable error codes.

/// Every error enum implements this to expose a structured code string
/// that job schedulers and log queries can match on.
pub trait UrbanfluxErrorCode {
    /// Returns the error code string (e.g., "STORAGE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const DB_BUSY: &str = "DB_BUSY";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const CORRUPT_ROW: &str = "CORRUPT_ROW";
pub const FETCH_FAILED: &str = "FETCH_FAILED";
pub const HTTP_STATUS: &str = "HTTP_STATUS";
pub const DECODE_FAILED: &str = "DECODE_FAILED";
pub const TIMEOUT: &str = "TIMEOUT";
pub const UNKNOWN_VARIANT: &str = "UNKNOWN_VARIANT";
pub const UNKNOWN_EVENT_TYPE: &str = "UNKNOWN_EVENT_TYPE";
pub const AGGREGATION_FAILED: &str = "AGGREGATION_FAILED";
pub const CANCELLED: &str = "CANCELLED";
