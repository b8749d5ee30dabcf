//! Schema migrations, tracked through `PRAGMA user_version`.

pub mod v001_initial;
pub mod v002_sync_runs;

use rusqlite::Connection;
use urbanflux_core::errors::StorageError;

/// Ordered `(sql, version)` pairs. Versions are strictly increasing.
const MIGRATIONS: &[(&str, u32)] = &[
    (v001_initial::MIGRATION_SQL, 1),
    (v002_sync_runs::MIGRATION_SQL, 2),
];

/// Latest schema version this build knows about.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |(_, v)| *v)
}

pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(StorageError::sqlite)
}

/// Apply every migration newer than the database's version, each in its own
/// transaction. Returns the resulting version.
pub fn run_migrations(conn: &Connection) -> Result<u32, StorageError> {
    let mut current = current_version(conn)?;
    for &(sql, version) in MIGRATIONS {
        if version <= current {
            continue;
        }
        let failed = |e: rusqlite::Error| StorageError::MigrationFailed {
            version,
            message: e.to_string(),
        };
        let tx = conn.unchecked_transaction().map_err(failed)?;
        tx.execute_batch(sql).map_err(failed)?;
        tx.pragma_update(None, "user_version", version)
            .map_err(failed)?;
        tx.commit().map_err(failed)?;
        tracing::info!(version, "applied migration");
        current = version;
    }
    Ok(current)
}
