//! Seams between the pipeline stages and their collaborators.

pub mod cancellation;
pub mod store;

pub use cancellation::{Cancellable, CancellationToken};
pub use store::{PipelineStore, SyncLedger};
