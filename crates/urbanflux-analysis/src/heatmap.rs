//! Spatial aggregation of transformation states into hex cells.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use urbanflux_core::errors::AggregationError;
use urbanflux_core::model::{GeocodedState, HeatmapCell, Nature};

use crate::hexgrid::{HexCell, HexGrid};

/// Running statistics for one occupied cell.
#[derive(Debug)]
struct CellAccumulator {
    cell: HexCell,
    intensity_sum: f64,
    intensity_max: f64,
    count: u32,
    /// Nature tallies in first-seen order.
    natures: Vec<(Nature, u32)>,
}

impl CellAccumulator {
    fn new(cell: HexCell) -> Self {
        Self {
            cell,
            intensity_sum: 0.0,
            intensity_max: f64::MIN,
            count: 0,
            natures: Vec::new(),
        }
    }

    fn add(&mut self, state: &GeocodedState) {
        self.intensity_sum += state.intensity;
        self.intensity_max = self.intensity_max.max(state.intensity);
        self.count += 1;
        match self.natures.iter_mut().find(|(n, _)| *n == state.nature) {
            Some((_, tally)) => *tally += 1,
            None => self.natures.push((state.nature, 1)),
        }
    }

    /// Mode of the contributing natures; the earliest seen wins a tie.
    fn dominant_nature(&self) -> Nature {
        let mut best: Option<(Nature, u32)> = None;
        for &(nature, tally) in &self.natures {
            if best.map_or(true, |(_, top)| tally > top) {
                best = Some((nature, tally));
            }
        }
        best.map_or(Nature::Mixed, |(nature, _)| nature)
    }

    fn finish(self, grid: &HexGrid, computed_at: DateTime<Utc>) -> HeatmapCell {
        let (center_lat, center_lng) = grid.center(self.cell);
        let mean = self.intensity_sum / f64::from(self.count);
        HeatmapCell {
            cell_index: self.cell.to_string(),
            center_lat,
            center_lng,
            avg_intensity: (mean * 100.0).round() / 100.0,
            max_intensity: self.intensity_max,
            place_count: self.count,
            dominant_nature: self.dominant_nature(),
            computed_at,
        }
    }
}

fn valid_coordinate(state: &GeocodedState) -> bool {
    state.latitude.is_finite()
        && state.longitude.is_finite()
        && (-90.0..=90.0).contains(&state.latitude)
        && (-180.0..=180.0).contains(&state.longitude)
}

/// Bin states into cells. Cells come out in the order they were first hit.
///
/// A coordinate outside the valid range fails the whole aggregation rather
/// than producing a partial heatmap.
pub fn aggregate_cells(
    states: &[GeocodedState],
    grid: &HexGrid,
    computed_at: DateTime<Utc>,
) -> Result<Vec<HeatmapCell>, AggregationError> {
    let mut slots: FxHashMap<HexCell, usize> = FxHashMap::default();
    let mut cells: Vec<CellAccumulator> = Vec::new();

    for state in states {
        if !valid_coordinate(state) {
            return Err(AggregationError::InvalidCoordinate {
                location_id: state.location_id,
                latitude: state.latitude,
                longitude: state.longitude,
            });
        }
        let cell = grid.cell_for(state.latitude, state.longitude);
        let slot = *slots.entry(cell).or_insert_with(|| {
            cells.push(CellAccumulator::new(cell));
            cells.len() - 1
        });
        cells[slot].add(state);
    }

    Ok(cells
        .into_iter()
        .map(|acc| acc.finish(grid, computed_at))
        .collect())
}
