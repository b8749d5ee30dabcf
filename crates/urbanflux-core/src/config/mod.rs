//! Configuration system for Urbanflux.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod analysis_config;
pub mod defaults;
pub mod sources_config;
pub mod storage_config;
pub mod urbanflux_config;

pub use analysis_config::AnalysisConfig;
pub use sources_config::SourcesConfig;
pub use storage_config::StorageConfig;
pub use urbanflux_config::{CliOverrides, UrbanfluxConfig};
