//! StorageEngine: owns the DatabaseManager, implements PipelineStore + SyncLedger.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use urbanflux_core::config::StorageConfig;
use urbanflux_core::errors::StorageError;
use urbanflux_core::model::{
    CanonicalEvent, GeocodedState, HeatmapCell, Location, LocationEvents, Source, StoredEvent,
    SyncRun, SyncRunOutcome, TransformationState,
};
use urbanflux_core::traits::{PipelineStore, SyncLedger};

use crate::connection::writer::with_immediate_transaction;
use crate::connection::DatabaseManager;
use crate::queries::{self, encode_time, StoreCounts};

/// The SQLite-backed pipeline store.
pub struct StorageEngine {
    db: DatabaseManager,
}

impl StorageEngine {
    /// Open a file-backed store with default pool size and busy timeout.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Self::open_with_config(path, &StorageConfig::default())
    }

    pub fn open_with_config(path: &Path, config: &StorageConfig) -> Result<Self, StorageError> {
        let db = DatabaseManager::open(
            path,
            config.effective_read_pool_size(),
            Duration::from_millis(u64::from(config.effective_busy_timeout_ms())),
        )?;
        Ok(Self { db })
    }

    /// Open an in-memory store (for testing). Reads go through the writer.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            db: DatabaseManager::open_in_memory()?,
        })
    }

    /// Get a reference to the database manager (for advanced operations).
    pub fn db(&self) -> &DatabaseManager {
        &self.db
    }

    pub fn counts(&self) -> Result<StoreCounts, StorageError> {
        self.db.with_reader(queries::stats::table_counts)
    }

    pub fn event_counts_by_source(&self) -> Result<Vec<(String, u64)>, StorageError> {
        self.db.with_reader(queries::events::count_by_source)
    }

    pub fn find_location(&self, location_ref: &str) -> Result<Option<Location>, StorageError> {
        self.db
            .with_reader(|conn| queries::places::get_by_ref(conn, location_ref))
    }

    /// An event and the id of the place it is linked to.
    pub fn find_event(
        &self,
        source: Source,
        source_id: &str,
    ) -> Result<Option<(StoredEvent, Option<i64>)>, StorageError> {
        self.db
            .with_reader(|conn| queries::events::get_event(conn, source.as_str(), source_id))
    }

    pub fn get_transformation_state(
        &self,
        location_id: i64,
    ) -> Result<Option<TransformationState>, StorageError> {
        self.db
            .with_reader(|conn| queries::states::get_state(conn, location_id))
    }

    pub fn heatmap_cells(&self) -> Result<Vec<HeatmapCell>, StorageError> {
        self.db.with_reader(queries::heatmap::query_all)
    }
}

/// Upsert one event and its place inside an open transaction.
fn write_event(
    conn: &rusqlite::Connection,
    event: &CanonicalEvent,
    now: &str,
) -> Result<(), StorageError> {
    let location_id = match event.location_ref.as_deref() {
        Some(location_ref) => Some(queries::places::upsert_from_event(
            conn,
            location_ref,
            event,
            now,
        )?),
        None => None,
    };
    queries::events::upsert_event(conn, event, location_id, now)
}

impl PipelineStore for StorageEngine {
    fn upsert_event(&self, event: &CanonicalEvent) -> Result<(), StorageError> {
        let now = encode_time(&Utc::now());
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| write_event(tx, event, &now))
        })
    }

    fn upsert_events(&self, events: &[CanonicalEvent]) -> Result<usize, StorageError> {
        if events.is_empty() {
            return Ok(0);
        }
        let now = encode_time(&Utc::now());
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                for event in events {
                    write_event(tx, event, &now)?;
                }
                Ok(events.len())
            })
        })
    }

    fn find_locations_with_events(
        &self,
        after_id: i64,
        limit: usize,
    ) -> Result<Vec<LocationEvents>, StorageError> {
        self.db.with_reader(|conn| {
            let locations = queries::places::query_with_events_after(conn, after_id, limit)?;
            locations
                .into_iter()
                .map(|location| {
                    let events = queries::events::query_by_location(conn, location.id)?;
                    Ok(LocationEvents { location, events })
                })
                .collect()
        })
    }

    fn find_geocoded_locations_with_state(&self) -> Result<Vec<GeocodedState>, StorageError> {
        self.db.with_reader(queries::states::query_geocoded_with_state)
    }

    fn upsert_transformation_state(
        &self,
        state: &TransformationState,
    ) -> Result<(), StorageError> {
        self.db
            .with_writer(|conn| queries::states::upsert_state(conn, state))
    }

    fn delete_orphaned_transformation_states(&self) -> Result<usize, StorageError> {
        self.db.with_writer(queries::states::delete_orphans)
    }

    fn delete_all_heatmap_cells(&self) -> Result<usize, StorageError> {
        self.db.with_writer(queries::heatmap::delete_all)
    }

    fn insert_heatmap_cell(&self, cell: &HeatmapCell) -> Result<(), StorageError> {
        self.db
            .with_writer(|conn| queries::heatmap::insert_cell(conn, cell))
    }

    fn replace_heatmap_cells(&self, cells: &[HeatmapCell]) -> Result<usize, StorageError> {
        self.db
            .with_writer(|conn| queries::heatmap::replace_all(conn, cells))
    }
}

impl SyncLedger for StorageEngine {
    fn begin_sync_run(
        &self,
        source: Source,
        started_at: DateTime<Utc>,
        since: Option<DateTime<Utc>>,
    ) -> Result<i64, StorageError> {
        self.db.with_writer(|conn| {
            queries::sync_runs::insert_run_start(conn, source, &started_at, since.as_ref())
        })
    }

    fn finish_sync_run(&self, run_id: i64, outcome: &SyncRunOutcome) -> Result<(), StorageError> {
        self.db
            .with_writer(|conn| queries::sync_runs::update_run_finish(conn, run_id, outcome))
    }

    fn last_complete_sync(&self, source: Source) -> Result<Option<DateTime<Utc>>, StorageError> {
        self.db
            .with_reader(|conn| queries::sync_runs::last_complete_start(conn, source))
    }

    fn recent_sync_runs(&self, limit: usize) -> Result<Vec<SyncRun>, StorageError> {
        self.db
            .with_reader(|conn| queries::sync_runs::query_recent(conn, limit))
    }
}
