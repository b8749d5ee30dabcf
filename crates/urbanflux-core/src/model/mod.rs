//! Canonical event model: the shared vocabulary every source adapter maps into,
//! plus the derived records the pipeline persists.

pub mod borough;
pub mod certainty;
pub mod event;
pub mod event_type;
pub mod heatmap;
pub mod location;
pub mod nature;
pub mod source;
pub mod state;
pub mod sync_run;

pub use borough::{Borough, BoroughPolicy};
pub use certainty::Certainty;
pub use event::{CanonicalEvent, StoredEvent};
pub use event_type::EventType;
pub use heatmap::HeatmapCell;
pub use location::{GeocodedState, Location, LocationEvents};
pub use nature::Nature;
pub use source::Source;
pub use state::TransformationState;
pub use sync_run::{SyncRun, SyncRunOutcome, SyncRunStatus};
