//! Connection pragmas for the writer and the read pool.

use std::time::Duration;

use rusqlite::Connection;
use urbanflux_core::errors::StorageError;

/// Writer settings. The WAL is capped at 64 MiB between checkpoints.
const WRITER_PRAGMAS: &[(&str, &str)] = &[
    ("journal_mode", "WAL"),
    ("synchronous", "NORMAL"),
    ("foreign_keys", "ON"),
    ("temp_store", "MEMORY"),
    ("cache_size", "-64000"),
    ("journal_size_limit", "67108864"),
];

const READER_PRAGMAS: &[(&str, &str)] = &[("query_only", "ON"), ("cache_size", "-16000")];

fn apply(conn: &Connection, pragmas: &[(&str, &str)], busy_timeout: Duration) -> Result<(), StorageError> {
    conn.busy_timeout(busy_timeout).map_err(StorageError::sqlite)?;
    let batch: String = pragmas
        .iter()
        .map(|(name, value)| format!("PRAGMA {name} = {value};\n"))
        .collect();
    conn.execute_batch(&batch).map_err(StorageError::sqlite)?;
    Ok(())
}

pub fn apply_pragmas(conn: &Connection, busy_timeout: Duration) -> Result<(), StorageError> {
    apply(conn, WRITER_PRAGMAS, busy_timeout)
}

pub fn apply_read_pragmas(conn: &Connection, busy_timeout: Duration) -> Result<(), StorageError> {
    apply(conn, READER_PRAGMAS, busy_timeout)
}

/// True when the database runs in WAL mode. In-memory databases report `memory`.
pub fn verify_wal_mode(conn: &Connection) -> Result<bool, StorageError> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(StorageError::sqlite)?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
