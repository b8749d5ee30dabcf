//! Blocking HTTP client for SODA endpoints with a bounded request timeout.
//!
//! No retries here: a failed page is reported to the sync loop, and retrying
//! is left to whatever schedules the next run.

use std::time::Duration;

use reqwest::blocking::Client;
use urbanflux_core::constants::{APP_TOKEN_HEADER, USER_AGENT};
use urbanflux_core::errors::SourceError;
use urbanflux_core::model::Source;

use super::query::PageQuery;
use crate::raw::RawRecord;

/// Anything that can return one page of raw records.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, source: Source, query: &PageQuery) -> Result<Vec<RawRecord>, SourceError>;
}

/// Configuration for the SODA transport.
#[derive(Debug, Clone)]
pub struct SodaClientConfig {
    /// Portal base URL, without trailing slash.
    pub base_url: String,
    /// Optional app token; raises the portal's rate limits.
    pub app_token: Option<String>,
    /// Per-request timeout. The request is abandoned when it elapses.
    pub timeout: Duration,
}

impl Default for SodaClientConfig {
    fn default() -> Self {
        Self {
            base_url: urbanflux_core::config::defaults::DEFAULT_BASE_URL.to_string(),
            app_token: None,
            timeout: Duration::from_secs(
                urbanflux_core::config::defaults::DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
        }
    }
}

impl SodaClientConfig {
    pub fn from_config(config: &urbanflux_core::config::SourcesConfig) -> Self {
        Self {
            base_url: config.effective_base_url().trim_end_matches('/').to_string(),
            app_token: config.app_token.clone().filter(|t| !t.trim().is_empty()),
            timeout: config.effective_request_timeout(),
        }
    }
}

#[derive(Debug)]
pub struct SodaClient {
    config: SodaClientConfig,
    client: Client,
}

impl SodaClient {
    pub fn new(config: SodaClientConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .gzip(true)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SourceError::Request {
                source_name: "client".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &SodaClientConfig {
        &self.config
    }

    fn classify(&self, source: Source, e: reqwest::Error) -> SourceError {
        if e.is_timeout() {
            SourceError::Timeout {
                source_name: source.to_string(),
                seconds: self.config.timeout.as_secs(),
            }
        } else {
            SourceError::Request {
                source_name: source.to_string(),
                message: e.to_string(),
            }
        }
    }
}

impl PageFetcher for SodaClient {
    fn fetch(&self, source: Source, query: &PageQuery) -> Result<Vec<RawRecord>, SourceError> {
        let url = format!("{}{}", self.config.base_url, query.path());
        let mut request = self.client.get(&url).query(&query.params());
        if let Some(ref token) = self.config.app_token {
            request = request.header(APP_TOKEN_HEADER, token);
        }

        tracing::debug!(
            source = %source,
            offset = query.offset,
            limit = query.limit,
            "fetching page"
        );

        let response = request.send().map_err(|e| self.classify(source, e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SourceError::HttpStatus {
                source_name: source.to_string(),
                status: status.as_u16(),
                body: body.chars().take(512).collect(),
            });
        }

        let rows: Vec<serde_json::Map<String, serde_json::Value>> = response
            .json()
            .map_err(|e| {
                if e.is_timeout() {
                    self.classify(source, e)
                } else {
                    SourceError::Decode {
                        source_name: source.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;
        Ok(rows.into_iter().map(RawRecord::new).collect())
    }
}
