use chrono::{DateTime, Utc};

use crate::errors::StorageError;
use crate::model::{
    CanonicalEvent, GeocodedState, HeatmapCell, LocationEvents, Source, SyncRun,
    SyncRunOutcome, TransformationState,
};

/// The durable store the pipeline reads from and writes to.
///
/// Upserts are keyed so that independent ingestion jobs for different
/// sources can write concurrently without external locking.
pub trait PipelineStore: Send + Sync {
    // --- Events ---
    /// Insert-or-update on `(source, source_id)`, linking the event to the
    /// place named by its location reference.
    fn upsert_event(&self, event: &CanonicalEvent) -> Result<(), StorageError>;
    /// Batch form of [`PipelineStore::upsert_event`]; one transaction per call.
    fn upsert_events(&self, events: &[CanonicalEvent]) -> Result<usize, StorageError>;

    // --- Derivation reads ---
    /// Locations with at least one event, `id > after_id`, ascending, at most `limit`.
    fn find_locations_with_events(
        &self,
        after_id: i64,
        limit: usize,
    ) -> Result<Vec<LocationEvents>, StorageError>;
    /// Locations with both coordinates and a transformation state, by id.
    fn find_geocoded_locations_with_state(&self) -> Result<Vec<GeocodedState>, StorageError>;

    // --- Derivation writes ---
    fn upsert_transformation_state(&self, state: &TransformationState)
        -> Result<(), StorageError>;
    /// Remove states whose location has lost all of its events, e.g. after an
    /// event was re-keyed to a corrected location reference.
    fn delete_orphaned_transformation_states(&self) -> Result<usize, StorageError>;
    fn delete_all_heatmap_cells(&self) -> Result<usize, StorageError>;
    fn insert_heatmap_cell(&self, cell: &HeatmapCell) -> Result<(), StorageError>;
    /// Replace the whole heatmap in one atomic unit. Readers see either the
    /// previous snapshot or the new one, never an empty table.
    fn replace_heatmap_cells(&self, cells: &[HeatmapCell]) -> Result<usize, StorageError>;
}

/// Ingestion run bookkeeping, used for incremental sync watermarks.
pub trait SyncLedger: Send + Sync {
    fn begin_sync_run(
        &self,
        source: Source,
        started_at: DateTime<Utc>,
        since: Option<DateTime<Utc>>,
    ) -> Result<i64, StorageError>;
    fn finish_sync_run(&self, run_id: i64, outcome: &SyncRunOutcome) -> Result<(), StorageError>;
    /// Start time of the latest complete run for `source`.
    fn last_complete_sync(&self, source: Source) -> Result<Option<DateTime<Utc>>, StorageError>;
    fn recent_sync_runs(&self, limit: usize) -> Result<Vec<SyncRun>, StorageError>;
}
