//! One serialized writer plus a pool of WAL readers.
//!
//! Ingestion and derivation funnel every write through the writer mutex;
//! status queries and derivation reads go to the pool.

pub mod pool;
pub mod pragmas;
pub mod writer;

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::Connection;
use urbanflux_core::config::defaults::DEFAULT_BUSY_TIMEOUT_MS;
use urbanflux_core::errors::StorageError;

use self::pool::ReadPool;
use crate::migrations;

pub struct DatabaseManager {
    writer: Mutex<Connection>,
    /// `None` for in-memory stores, which cannot be shared across connections.
    readers: Option<ReadPool>,
    path: Option<PathBuf>,
}

/// Configure and migrate a fresh writer connection.
fn prepare_writer(conn: &Connection, busy_timeout: Duration) -> Result<u32, StorageError> {
    pragmas::apply_pragmas(conn, busy_timeout)?;
    migrations::run_migrations(conn)
}

impl DatabaseManager {
    /// Open (creating if needed) the store at `path` and bring its schema
    /// up to date before any reader connects.
    pub fn open(
        path: &Path,
        read_pool_size: usize,
        busy_timeout: Duration,
    ) -> Result<Self, StorageError> {
        let writer = Connection::open(path).map_err(StorageError::sqlite)?;
        let schema_version = prepare_writer(&writer, busy_timeout)?;
        let readers = ReadPool::open(path, read_pool_size, busy_timeout)?;
        tracing::info!(
            path = %path.display(),
            schema_version,
            readers = readers.size(),
            "store opened"
        );

        Ok(Self {
            writer: Mutex::new(writer),
            readers: Some(readers),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let writer = Connection::open_in_memory().map_err(StorageError::sqlite)?;
        prepare_writer(
            &writer,
            Duration::from_millis(u64::from(DEFAULT_BUSY_TIMEOUT_MS)),
        )?;
        Ok(Self {
            writer: Mutex::new(writer),
            readers: None,
            path: None,
        })
    }

    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let conn = self.writer.lock().map_err(|_| StorageError::SqliteError {
            message: "writer lock poisoned".to_string(),
        })?;
        f(&conn)
    }

    /// Read on a pooled connection; in-memory stores read through the writer.
    pub fn with_reader<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        match &self.readers {
            Some(pool) => pool.with_conn(f),
            None => self.with_writer(f),
        }
    }

    /// Fold the WAL back into the main file. Called after ingestion.
    pub fn checkpoint(&self) -> Result<(), StorageError> {
        if self.path.is_none() {
            return Ok(());
        }
        self.with_writer(|conn| {
            conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))
                .map_err(StorageError::sqlite)
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn read_pool_size(&self) -> usize {
        self.readers.as_ref().map_or(0, ReadPool::size)
    }
}
