//! Phase one of derivation: recompute every location's transformation state.

use chrono::{DateTime, Utc};
use urbanflux_core::errors::{PipelineError, TransformationError};
use urbanflux_core::model::LocationEvents;
use urbanflux_core::traits::{Cancellable, PipelineStore};

use crate::transformation::{compute_state, event_types_of};

#[derive(Debug, Default)]
pub struct RecomputeReport {
    /// Locations read from the store.
    pub processed: u64,
    /// States written.
    pub written: u64,
    pub batches: u32,
    /// Stale states removed for locations left without events.
    pub pruned: u64,
    /// Locations skipped; their previous state row was left alone.
    pub failures: Vec<TransformationError>,
}

impl RecomputeReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn failed_location_ids(&self) -> Vec<i64> {
        self.failures.iter().map(TransformationError::location_id).collect()
    }
}

fn recompute_location(
    store: &dyn PipelineStore,
    location: &LocationEvents,
    computed_at: DateTime<Utc>,
) -> Result<(), TransformationError> {
    let event_types = event_types_of(location)?;
    let state = compute_state(location.location.id, &event_types, computed_at);
    store
        .upsert_transformation_state(&state)
        .map_err(|source| TransformationError::WriteFailed {
            location_id: location.location.id,
            source,
        })
}

/// Walk all locations with events in keyset batches of `batch_size`.
///
/// Per-location failures land in the report. A failed batch read aborts the
/// phase, as does cancellation between batches. Once every batch is done,
/// states of locations with no remaining events are pruned.
pub fn recompute_states(
    store: &dyn PipelineStore,
    batch_size: usize,
    computed_at: DateTime<Utc>,
    cancel: &dyn Cancellable,
) -> Result<RecomputeReport, PipelineError> {
    let batch_size = batch_size.max(1);
    let mut report = RecomputeReport::default();
    let mut after_id = 0i64;

    loop {
        if let Err(e) = cancel.check() {
            tracing::warn!(processed = report.processed, "recompute cancelled");
            return Err(e);
        }

        let batch = store.find_locations_with_events(after_id, batch_size)?;
        let Some(last) = batch.last() else { break };
        after_id = last.location.id;
        report.batches += 1;

        for location in &batch {
            report.processed += 1;
            match recompute_location(store, location, computed_at) {
                Ok(()) => report.written += 1,
                Err(e) => {
                    tracing::warn!(location_id = e.location_id(), error = %e, "skipping location");
                    report.failures.push(e);
                }
            }
        }

        tracing::debug!(batch = report.batches, size = batch.len(), after_id, "batch recomputed");
        if batch.len() < batch_size {
            break;
        }
    }

    report.pruned = store.delete_orphaned_transformation_states()? as u64;

    tracing::info!(
        processed = report.processed,
        written = report.written,
        pruned = report.pruned,
        failed = report.failed(),
        batches = report.batches,
        "transformation states recomputed"
    );
    Ok(report)
}
