//! Storage-layer errors for SQLite operations.

use super::error_code::{self, UrbanfluxErrorCode};

/// Errors raised by the durable store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("corrupt row in {table}: {message}")]
    CorruptRow { table: String, message: String },
}

impl StorageError {
    /// Shorthand used by every query module's `map_err`.
    pub fn sqlite(e: impl std::fmt::Display) -> Self {
        Self::SqliteError {
            message: e.to_string(),
        }
    }

    /// Whether the failure came from lock contention rather than bad data.
    pub fn is_busy(&self) -> bool {
        match self {
            Self::SqliteError { message } => {
                message.contains("database is locked") || message.contains("database is busy")
            }
            _ => false,
        }
    }
}

impl UrbanfluxErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SqliteError { .. } if self.is_busy() => error_code::DB_BUSY,
            Self::SqliteError { .. } => error_code::STORAGE_ERROR,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::CorruptRow { .. } => error_code::CORRUPT_ROW,
        }
    }
}
