//! # urbanflux-sources
//!
//! One adapter per external open-data feed. Each adapter pages through its
//! dataset newest-first and normalizes raw records into canonical events;
//! the sync loop persists them and records the run in the ledger.
//!
//! Fetch failures never abort a job: they end that source's run as
//! incomplete so the incremental watermark is not advanced past a gap.

pub mod adapters;
pub mod ingest;
pub mod raw;
pub mod sync;
pub mod transport;

pub use adapters::{adapter_for, NormalizeContext, PageOutcome, SourceAdapter};
pub use ingest::{IngestOptions, IngestSummary, IngestionJob};
pub use raw::RawRecord;
pub use sync::{sync_source, StopReason, SyncOptions, SyncReport};
pub use transport::{PageFetcher, PageQuery, SodaClient, SodaClientConfig};
