//! The two-phase derivation job.
//!
//! Aggregation reads the states recompute writes, so the phases never
//! overlap: all of phase one commits before phase two starts.

use chrono::{DateTime, Utc};
use urbanflux_core::config::defaults::{DEFAULT_ANALYSIS_BATCH_SIZE, DEFAULT_HEX_RESOLUTION};
use urbanflux_core::config::AnalysisConfig;
use urbanflux_core::errors::{AggregationError, PipelineError};
use urbanflux_core::traits::{CancellationToken, PipelineStore};

use crate::heatmap::aggregate_cells;
use crate::hexgrid::HexGrid;
use crate::recompute::{recompute_states, RecomputeReport};

#[derive(Debug)]
pub struct DerivationReport {
    pub computed_at: DateTime<Utc>,
    pub recompute: RecomputeReport,
    /// Heatmap cells written by the swap.
    pub cells: usize,
}

pub struct DerivationJob<'a> {
    store: &'a dyn PipelineStore,
    batch_size: usize,
    resolution: u8,
    cancel: CancellationToken,
}

impl<'a> DerivationJob<'a> {
    pub fn new(store: &'a dyn PipelineStore) -> Self {
        Self {
            store,
            batch_size: DEFAULT_ANALYSIS_BATCH_SIZE,
            resolution: DEFAULT_HEX_RESOLUTION,
            cancel: CancellationToken::new(),
        }
    }

    pub fn from_config(store: &'a dyn PipelineStore, config: &AnalysisConfig) -> Self {
        Self::new(store)
            .with_batch_size(config.effective_batch_size())
            .with_resolution(config.effective_hex_resolution())
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_resolution(mut self, resolution: u8) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn run(&self) -> Result<DerivationReport, PipelineError> {
        self.run_at(Utc::now())
    }

    /// Run both phases stamping every state and cell with `computed_at`.
    pub fn run_at(&self, computed_at: DateTime<Utc>) -> Result<DerivationReport, PipelineError> {
        // Fail on a bad resolution before touching any state.
        let grid = HexGrid::new(self.resolution)?;

        let recompute = {
            let span = tracing::info_span!("recompute", batch_size = self.batch_size);
            let _guard = span.enter();
            recompute_states(self.store, self.batch_size, computed_at, &self.cancel)?
        };

        let cells = {
            let span = tracing::info_span!("aggregate", resolution = self.resolution);
            let _guard = span.enter();
            self.aggregate(&grid, computed_at)?
        };

        Ok(DerivationReport {
            computed_at,
            recompute,
            cells,
        })
    }

    fn aggregate(&self, grid: &HexGrid, computed_at: DateTime<Utc>) -> Result<usize, AggregationError> {
        let states = self.store.find_geocoded_locations_with_state()?;
        let cells = aggregate_cells(&states, grid, computed_at)?;
        let written = self.store.replace_heatmap_cells(&cells)?;
        tracing::info!(locations = states.len(), cells = written, "heatmap rebuilt");
        Ok(written)
    }
}
