//! Subscriber installation for the `urbanflux` binary and tests.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::defaults::DEFAULT_LOG_FILTER;

/// Environment variable holding `EnvFilter` directives.
pub const LOG_ENV: &str = "URBANFLUX_LOG";

static INSTALL: Once = Once::new();

/// Directives to use given the raw `URBANFLUX_LOG` value. Blank or
/// unparsable values fall back to `urbanflux=info`.
pub fn filter_directives(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|d| !d.is_empty() && EnvFilter::try_new(d).is_ok())
        .unwrap_or(DEFAULT_LOG_FILTER)
        .to_string()
}

/// Install the global subscriber once.
///
/// Logs go to stderr so `--format json` output on stdout stays parseable.
/// Example: `URBANFLUX_LOG=urbanflux_sources=debug,urbanflux_storage=warn`.
pub fn init_tracing() {
    INSTALL.call_once(|| {
        let raw = std::env::var(LOG_ENV).ok();
        let filter = EnvFilter::new(filter_directives(raw.as_deref()));
        // Another subscriber may already be installed by an embedding host.
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true).compact())
            .with(filter)
            .try_init();
    });
}
