// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "urbanflux.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Sources ---
pub const DEFAULT_BASE_URL: &str = "https://data.cityofnewyork.us";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

// --- Analysis ---
pub const DEFAULT_ANALYSIS_BATCH_SIZE: usize = 500;
pub const DEFAULT_HEX_RESOLUTION: u8 = 8;
pub const MIN_HEX_RESOLUTION: u8 = 5;
pub const MAX_HEX_RESOLUTION: u8 = 10;

// --- Observability ---
pub const DEFAULT_LOG_FILTER: &str = "urbanflux=info";
