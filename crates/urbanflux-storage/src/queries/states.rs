//! Queries for the transformation_states table.

use rusqlite::{params, Connection};
use urbanflux_core::errors::StorageError;
use urbanflux_core::model::{GeocodedState, TransformationState};

use super::{decode_enum, decode_time, encode_time};

pub fn upsert_state(conn: &Connection, state: &TransformationState) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO transformation_states
            (location_id, certainty, intensity, nature, computed_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(location_id) DO UPDATE SET
            certainty = excluded.certainty,
            intensity = excluded.intensity,
            nature = excluded.nature,
            computed_at = excluded.computed_at",
    )
    .map_err(StorageError::sqlite)?
    .execute(params![
        state.location_id,
        state.certainty.as_str(),
        state.intensity,
        state.nature.as_str(),
        encode_time(&state.computed_at),
    ])
    .map_err(StorageError::sqlite)?;
    Ok(())
}

pub fn get_state(
    conn: &Connection,
    location_id: i64,
) -> Result<Option<TransformationState>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT location_id, certainty, intensity, nature, computed_at
             FROM transformation_states WHERE location_id = ?1",
        )
        .map_err(StorageError::sqlite)?;
    let mut rows = stmt
        .query_map(params![location_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .map_err(StorageError::sqlite)?;

    let Some(row) = rows.next() else {
        return Ok(None);
    };
    let (location_id, certainty, intensity, nature, computed_at) =
        row.map_err(StorageError::sqlite)?;
    Ok(Some(TransformationState {
        location_id,
        certainty: decode_enum("transformation_states", &certainty)?,
        intensity,
        nature: decode_enum("transformation_states", &nature)?,
        computed_at: decode_time("transformation_states", &computed_at)?,
    }))
}

/// Drop states of places that no longer have any linked event.
pub fn delete_orphans(conn: &Connection) -> Result<usize, StorageError> {
    conn.execute(
        "DELETE FROM transformation_states
         WHERE NOT EXISTS (
            SELECT 1 FROM events e WHERE e.location_id = transformation_states.location_id
         )",
        [],
    )
    .map_err(StorageError::sqlite)
}

/// Geocoded places joined to their state, ordered by place id.
pub fn query_geocoded_with_state(conn: &Connection) -> Result<Vec<GeocodedState>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT p.id, p.latitude, p.longitude, s.intensity, s.nature
             FROM places p
             JOIN transformation_states s ON s.location_id = p.id
             WHERE p.latitude IS NOT NULL AND p.longitude IS NOT NULL
             ORDER BY p.id",
        )
        .map_err(StorageError::sqlite)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .map_err(StorageError::sqlite)?;

    let mut states = Vec::new();
    for row in rows {
        let (location_id, latitude, longitude, intensity, nature) =
            row.map_err(StorageError::sqlite)?;
        states.push(GeocodedState {
            location_id,
            latitude,
            longitude,
            intensity,
            nature: decode_enum("transformation_states", &nature)?,
        });
    }
    Ok(states)
}
