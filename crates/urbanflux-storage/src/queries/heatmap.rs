//! Queries for the heatmap_cells table.

use rusqlite::{params, Connection};
use urbanflux_core::errors::StorageError;
use urbanflux_core::model::HeatmapCell;

use super::{decode_enum, decode_time, encode_time};
use crate::connection::writer::with_immediate_transaction;

pub fn delete_all(conn: &Connection) -> Result<usize, StorageError> {
    conn.execute("DELETE FROM heatmap_cells", [])
        .map_err(StorageError::sqlite)
}

pub fn insert_cell(conn: &Connection, cell: &HeatmapCell) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO heatmap_cells
            (cell_index, center_lat, center_lng, avg_intensity, max_intensity,
             place_count, dominant_nature, computed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .map_err(StorageError::sqlite)?
    .execute(params![
        cell.cell_index,
        cell.center_lat,
        cell.center_lng,
        cell.avg_intensity,
        cell.max_intensity,
        cell.place_count,
        cell.dominant_nature.as_str(),
        encode_time(&cell.computed_at),
    ])
    .map_err(StorageError::sqlite)?;
    Ok(())
}

/// Swap the heatmap for `cells` in one IMMEDIATE transaction.
///
/// On any failure nothing is committed and the previous snapshot stays.
pub fn replace_all(conn: &Connection, cells: &[HeatmapCell]) -> Result<usize, StorageError> {
    with_immediate_transaction(conn, |tx| {
        let removed = delete_all(tx)?;
        for cell in cells {
            insert_cell(tx, cell)?;
        }
        tracing::debug!(removed, inserted = cells.len(), "heatmap swapped");
        Ok(cells.len())
    })
}

/// Every cell, in insertion order.
pub fn query_all(conn: &Connection) -> Result<Vec<HeatmapCell>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT cell_index, center_lat, center_lng, avg_intensity, max_intensity,
                    place_count, dominant_nature, computed_at
             FROM heatmap_cells ORDER BY rowid",
        )
        .map_err(StorageError::sqlite)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, u32>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
            ))
        })
        .map_err(StorageError::sqlite)?;

    let mut cells = Vec::new();
    for row in rows {
        let (cell_index, center_lat, center_lng, avg, max, count, nature, computed_at) =
            row.map_err(StorageError::sqlite)?;
        cells.push(HeatmapCell {
            cell_index,
            center_lat,
            center_lng,
            avg_intensity: avg,
            max_intensity: max,
            place_count: count,
            dominant_nature: decode_enum("heatmap_cells", &nature)?,
            computed_at: decode_time("heatmap_cells", &computed_at)?,
        });
    }
    Ok(cells)
}
