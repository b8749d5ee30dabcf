//! V002: sync_runs: append-only ledger of ingestion runs.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS sync_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source TEXT NOT NULL,
    started_at TEXT NOT NULL,
    since TEXT,
    finished_at TEXT,
    pages INTEGER NOT NULL DEFAULT 0,
    failed_pages INTEGER NOT NULL DEFAULT 0,
    fetched INTEGER NOT NULL DEFAULT 0,
    normalized INTEGER NOT NULL DEFAULT 0,
    rejected INTEGER NOT NULL DEFAULT 0,
    upserted INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT 'running',
    error TEXT
) STRICT;

CREATE INDEX IF NOT EXISTS idx_sync_runs_source_status
    ON sync_runs(source, status, id);
"#;
