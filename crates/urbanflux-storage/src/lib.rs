//! # urbanflux-storage
//!
//! SQLite implementation of the pipeline store.
//! One serialized writer connection plus a round-robin read pool, WAL mode,
//! schema migrations through `PRAGMA user_version`, and one query module per
//! table.

pub mod connection;
pub mod engine;
pub mod migrations;
pub mod queries;

pub use connection::DatabaseManager;
pub use engine::StorageEngine;
pub use queries::StoreCounts;
