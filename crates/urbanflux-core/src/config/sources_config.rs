use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Open-data feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SourcesConfig {
    /// Base URL of the open-data portal.
    pub base_url: Option<String>,
    /// App token sent as `X-App-Token`; raises rate limits.
    pub app_token: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Sources to ingest by name. Empty = all.
    pub enabled: Vec<String>,
    /// Stop a run after this many pages.
    pub max_pages: Option<u32>,
}

impl SourcesConfig {
    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(defaults::DEFAULT_BASE_URL)
    }

    pub fn effective_request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(defaults::DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}
