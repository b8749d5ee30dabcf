//! Crate-wide constants.

/// Urbanflux version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User agent sent with every open-data request.
pub const USER_AGENT: &str = concat!("urbanflux/", env!("CARGO_PKG_VERSION"));

/// Header carrying the optional open-data app token (raises rate limits).
pub const APP_TOKEN_HEADER: &str = "X-App-Token";

/// Environment variable prefix for config overrides.
pub const ENV_PREFIX: &str = "URBANFLUX_";
