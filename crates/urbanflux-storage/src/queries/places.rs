//! Queries for the places table.

use rusqlite::{params, Connection, OptionalExtension, Row};
use urbanflux_core::errors::StorageError;
use urbanflux_core::model::{CanonicalEvent, Location};

pub(crate) const LOCATION_COLUMNS: &str =
    "id, location_ref, latitude, longitude, borough, community_district, nta";

pub(crate) fn location_from_row(row: &Row<'_>) -> rusqlite::Result<Location> {
    Ok(Location {
        id: row.get(0)?,
        location_ref: row.get(1)?,
        latitude: row.get(2)?,
        longitude: row.get(3)?,
        borough: row.get(4)?,
        community_district: row.get(5)?,
        nta: row.get(6)?,
    })
}

/// Create the place for `location_ref`, or fill its still-empty attributes
/// from `event`. Coordinates are taken only as a pair. Returns the place id.
pub fn upsert_from_event(
    conn: &Connection,
    location_ref: &str,
    event: &CanonicalEvent,
    now: &str,
) -> Result<i64, StorageError> {
    let (latitude, longitude) = event.coordinates().unzip();
    let id = conn
        .prepare_cached(
            "INSERT INTO places
                (location_ref, latitude, longitude, borough, community_district, nta,
                 created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             ON CONFLICT(location_ref) DO UPDATE SET
                latitude = CASE WHEN places.latitude IS NULL OR places.longitude IS NULL
                                THEN excluded.latitude ELSE places.latitude END,
                longitude = CASE WHEN places.latitude IS NULL OR places.longitude IS NULL
                                 THEN excluded.longitude ELSE places.longitude END,
                borough = COALESCE(places.borough, excluded.borough),
                community_district = COALESCE(places.community_district, excluded.community_district),
                nta = COALESCE(places.nta, excluded.nta),
                updated_at = excluded.updated_at
             RETURNING id",
        )
        .map_err(StorageError::sqlite)?
        .query_row(
            params![
                location_ref,
                latitude,
                longitude,
                event.borough,
                event.community_district,
                event.nta(),
                now
            ],
            |row| row.get(0),
        )
        .map_err(StorageError::sqlite)?;
    Ok(id)
}

pub fn get_by_ref(conn: &Connection, location_ref: &str) -> Result<Option<Location>, StorageError> {
    conn.prepare_cached(&format!(
        "SELECT {LOCATION_COLUMNS} FROM places WHERE location_ref = ?1"
    ))
    .map_err(StorageError::sqlite)?
    .query_row(params![location_ref], location_from_row)
    .optional()
    .map_err(StorageError::sqlite)
}

/// Places with at least one linked event, `id > after_id`, ascending.
pub fn query_with_events_after(
    conn: &Connection,
    after_id: i64,
    limit: usize,
) -> Result<Vec<Location>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {LOCATION_COLUMNS} FROM places p
             WHERE p.id > ?1
               AND EXISTS (SELECT 1 FROM events e WHERE e.location_id = p.id)
             ORDER BY p.id
             LIMIT ?2"
        ))
        .map_err(StorageError::sqlite)?;
    let rows = stmt
        .query_map(params![after_id, limit as i64], location_from_row)
        .map_err(StorageError::sqlite)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(StorageError::sqlite)
}
