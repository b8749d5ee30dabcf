//! # urbanflux-analysis
//!
//! Turns stored events into per-location transformation states, then bins
//! geocoded states into a hexagonal heatmap. The two phases run in order
//! inside one [`DerivationJob`].

pub mod certainty;
pub mod heatmap;
pub mod hexgrid;
pub mod job;
pub mod recompute;
pub mod transformation;

pub use certainty::{certainty_opacity, derive_certainty, should_show_dashed_border};
pub use heatmap::aggregate_cells;
pub use hexgrid::{HexCell, HexGrid};
pub use job::{DerivationJob, DerivationReport};
pub use recompute::{recompute_states, RecomputeReport};
pub use transformation::{compute_intensity, compute_nature, compute_state};
