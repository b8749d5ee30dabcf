//! # urbanflux-core
//!
//! Foundation crate for the Urbanflux pipeline.
//! Defines the canonical event model every source adapter maps into, the shared
//! date/borough/BBL utilities, errors, config, tracing, and the store traits.
//! Every other crate in the workspace depends on this.

pub mod bbl;
pub mod config;
pub mod constants;
pub mod dates;
pub mod errors;
pub mod model;
pub mod tracing;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::UrbanfluxConfig;
pub use errors::{PipelineError, StorageError};
pub use model::{
    Borough, BoroughPolicy, CanonicalEvent, Certainty, EventType, HeatmapCell, Location,
    Nature, Source, TransformationState,
};
pub use traits::{CancellationToken, PipelineStore, SyncLedger};
