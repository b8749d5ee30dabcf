//! Queries for the events table.

use rusqlite::{params, Connection};
use urbanflux_core::errors::StorageError;
use urbanflux_core::model::{CanonicalEvent, StoredEvent};

use super::{decode_time, encode_time};

/// Insert-or-update on `(source, source_id)`.
pub fn upsert_event(
    conn: &Connection,
    event: &CanonicalEvent,
    location_id: Option<i64>,
    ingested_at: &str,
) -> Result<(), StorageError> {
    let payload =
        serde_json::to_string(&event.raw_payload).map_err(|e| StorageError::CorruptRow {
            table: "events".to_string(),
            message: e.to_string(),
        })?;
    conn.prepare_cached(
        "INSERT INTO events
            (source, source_id, event_type, event_date, location_ref, location_id,
             borough, latitude, longitude, community_district, raw_payload, ingested_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
         ON CONFLICT(source, source_id) DO UPDATE SET
            event_type = excluded.event_type,
            event_date = excluded.event_date,
            location_ref = excluded.location_ref,
            location_id = excluded.location_id,
            borough = excluded.borough,
            latitude = excluded.latitude,
            longitude = excluded.longitude,
            community_district = excluded.community_district,
            raw_payload = excluded.raw_payload,
            ingested_at = excluded.ingested_at",
    )
    .map_err(StorageError::sqlite)?
    .execute(params![
        event.source.as_str(),
        event.source_id,
        event.event_type.as_str(),
        encode_time(&event.event_date),
        event.location_ref,
        location_id,
        event.borough,
        event.latitude,
        event.longitude,
        event.community_district,
        payload,
        ingested_at,
    ])
    .map_err(StorageError::sqlite)?;
    Ok(())
}

/// Events linked to one place, oldest first.
pub fn query_by_location(conn: &Connection, location_id: i64) -> Result<Vec<StoredEvent>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, source, source_id, event_type, event_date
             FROM events WHERE location_id = ?1
             ORDER BY event_date, id",
        )
        .map_err(StorageError::sqlite)?;
    let rows = stmt
        .query_map(params![location_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .map_err(StorageError::sqlite)?;

    let mut events = Vec::new();
    for row in rows {
        let (id, source, source_id, event_type, event_date) = row.map_err(StorageError::sqlite)?;
        events.push(StoredEvent {
            id,
            source,
            source_id,
            event_type,
            event_date: decode_time("events", &event_date)?,
        });
    }
    Ok(events)
}

/// Look up one event by identity, for diagnostics and tests.
pub fn get_event(
    conn: &Connection,
    source: &str,
    source_id: &str,
) -> Result<Option<(StoredEvent, Option<i64>)>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, source, source_id, event_type, event_date, location_id
             FROM events WHERE source = ?1 AND source_id = ?2",
        )
        .map_err(StorageError::sqlite)?;
    let mut rows = stmt
        .query_map(params![source, source_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<i64>>(5)?,
            ))
        })
        .map_err(StorageError::sqlite)?;

    let next = rows.next();
    match next {
        Some(row) => {
            let (id, source, source_id, event_type, event_date, location_id) =
                row.map_err(StorageError::sqlite)?;
            let event = StoredEvent {
                id,
                source,
                source_id,
                event_type,
                event_date: decode_time("events", &event_date)?,
            };
            Ok(Some((event, location_id)))
        }
        None => Ok(None),
    }
}

pub fn count_by_source(conn: &Connection) -> Result<Vec<(String, u64)>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT source, COUNT(*) FROM events GROUP BY source ORDER BY source")
        .map_err(StorageError::sqlite)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64)))
        .map_err(StorageError::sqlite)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(StorageError::sqlite)
}
