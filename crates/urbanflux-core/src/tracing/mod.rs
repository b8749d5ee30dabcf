//! Logging setup: `tracing` events filtered per crate through `URBANFLUX_LOG`.

pub mod setup;

pub use setup::{filter_directives, init_tracing, LOG_ENV};
