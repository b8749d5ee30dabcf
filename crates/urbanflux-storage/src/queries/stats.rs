//! Table counts for status reporting.

use rusqlite::Connection;
use urbanflux_core::errors::StorageError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub places: u64,
    pub geocoded_places: u64,
    pub events: u64,
    pub states: u64,
    pub heatmap_cells: u64,
}

pub fn table_counts(conn: &Connection) -> Result<StoreCounts, StorageError> {
    conn.query_row(
        "SELECT
            (SELECT COUNT(*) FROM places),
            (SELECT COUNT(*) FROM places WHERE latitude IS NOT NULL AND longitude IS NOT NULL),
            (SELECT COUNT(*) FROM events),
            (SELECT COUNT(*) FROM transformation_states),
            (SELECT COUNT(*) FROM heatmap_cells)",
        [],
        |row| {
            Ok(StoreCounts {
                places: row.get::<_, i64>(0)? as u64,
                geocoded_places: row.get::<_, i64>(1)? as u64,
                events: row.get::<_, i64>(2)? as u64,
                states: row.get::<_, i64>(3)? as u64,
                heatmap_cells: row.get::<_, i64>(4)? as u64,
            })
        },
    )
    .map_err(StorageError::sqlite)
}
