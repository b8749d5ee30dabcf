//! Queries for the sync_runs table: append-only log of ingestion runs.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use urbanflux_core::errors::StorageError;
use urbanflux_core::model::{Source, SyncRun, SyncRunOutcome, SyncRunStatus};

use super::{decode_enum, decode_time, encode_time};

/// Insert a new run (status = 'running'). Returns the row id.
pub fn insert_run_start(
    conn: &Connection,
    source: Source,
    started_at: &DateTime<Utc>,
    since: Option<&DateTime<Utc>>,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO sync_runs (source, started_at, since, status) VALUES (?1, ?2, ?3, 'running')",
        params![source.as_str(), encode_time(started_at), since.map(encode_time)],
    )
    .map_err(StorageError::sqlite)?;
    Ok(conn.last_insert_rowid())
}

/// Record the counters and final status of a run.
pub fn update_run_finish(
    conn: &Connection,
    id: i64,
    outcome: &SyncRunOutcome,
) -> Result<(), StorageError> {
    let updated = conn
        .execute(
            "UPDATE sync_runs SET
                finished_at = ?1, pages = ?2, failed_pages = ?3, fetched = ?4,
                normalized = ?5, rejected = ?6, upserted = ?7, status = ?8, error = ?9
             WHERE id = ?10",
            params![
                encode_time(&outcome.finished_at),
                outcome.pages,
                outcome.failed_pages,
                outcome.fetched as i64,
                outcome.normalized as i64,
                outcome.rejected as i64,
                outcome.upserted as i64,
                outcome.status.as_str(),
                outcome.error,
                id
            ],
        )
        .map_err(StorageError::sqlite)?;
    if updated == 0 {
        return Err(StorageError::CorruptRow {
            table: "sync_runs".to_string(),
            message: format!("no run with id {id}"),
        });
    }
    Ok(())
}

/// Start time of the newest complete run for `source`.
pub fn last_complete_start(
    conn: &Connection,
    source: Source,
) -> Result<Option<DateTime<Utc>>, StorageError> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT started_at FROM sync_runs
             WHERE source = ?1 AND status = ?2
             ORDER BY id DESC LIMIT 1",
            params![source.as_str(), SyncRunStatus::Complete.as_str()],
            |row| row.get(0),
        )
        .optional()
        .map_err(StorageError::sqlite)?;
    raw.map(|s| decode_time("sync_runs", &s)).transpose()
}

/// Most recent runs first.
pub fn query_recent(conn: &Connection, limit: usize) -> Result<Vec<SyncRun>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, source, started_at, since, finished_at, pages, failed_pages,
                    fetched, normalized, rejected, upserted, status, error
             FROM sync_runs ORDER BY id DESC LIMIT ?1",
        )
        .map_err(StorageError::sqlite)?;
    let rows = stmt
        .query_map(params![limit as i64], |row| {
            Ok(RawRun {
                id: row.get(0)?,
                source: row.get(1)?,
                started_at: row.get(2)?,
                since: row.get(3)?,
                finished_at: row.get(4)?,
                pages: row.get(5)?,
                failed_pages: row.get(6)?,
                fetched: row.get(7)?,
                normalized: row.get(8)?,
                rejected: row.get(9)?,
                upserted: row.get(10)?,
                status: row.get(11)?,
                error: row.get(12)?,
            })
        })
        .map_err(StorageError::sqlite)?;

    let mut runs = Vec::new();
    for row in rows {
        runs.push(row.map_err(StorageError::sqlite)?.decode()?);
    }
    Ok(runs)
}

struct RawRun {
    id: i64,
    source: String,
    started_at: String,
    since: Option<String>,
    finished_at: Option<String>,
    pages: u32,
    failed_pages: u32,
    fetched: i64,
    normalized: i64,
    rejected: i64,
    upserted: i64,
    status: String,
    error: Option<String>,
}

impl RawRun {
    fn decode(self) -> Result<SyncRun, StorageError> {
        const TABLE: &str = "sync_runs";
        Ok(SyncRun {
            id: self.id,
            source: decode_enum(TABLE, &self.source)?,
            started_at: decode_time(TABLE, &self.started_at)?,
            since: self.since.map(|s| decode_time(TABLE, &s)).transpose()?,
            finished_at: self.finished_at.map(|s| decode_time(TABLE, &s)).transpose()?,
            pages: self.pages,
            failed_pages: self.failed_pages,
            fetched: self.fetched.max(0) as u64,
            normalized: self.normalized.max(0) as u64,
            rejected: self.rejected.max(0) as u64,
            upserted: self.upserted.max(0) as u64,
            status: decode_enum(TABLE, &self.status)?,
            error: self.error,
        })
    }
}
