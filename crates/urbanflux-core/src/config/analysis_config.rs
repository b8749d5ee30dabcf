use serde::{Deserialize, Serialize};

use super::defaults;

/// Derivation and aggregation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Locations per recompute batch.
    pub batch_size: Option<usize>,
    /// Hex grid resolution for the heatmap.
    pub hex_resolution: Option<u8>,
}

impl AnalysisConfig {
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size
            .unwrap_or(defaults::DEFAULT_ANALYSIS_BATCH_SIZE)
    }

    pub fn effective_hex_resolution(&self) -> u8 {
        self.hex_resolution
            .unwrap_or(defaults::DEFAULT_HEX_RESOLUTION)
    }
}
