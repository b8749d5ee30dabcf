//! Top-level Urbanflux configuration with layered resolution.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{defaults, AnalysisConfig, SourcesConfig, StorageConfig};
use crate::errors::ConfigError;
use crate::model::Source;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`URBANFLUX_*`)
/// 3. Project config (`urbanflux.toml` in the working directory)
/// 4. User config (`~/.urbanflux/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UrbanfluxConfig {
    pub storage: StorageConfig,
    pub sources: SourcesConfig,
    pub analysis: AnalysisConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_file: Option<PathBuf>,
    pub db_path: Option<String>,
    pub app_token: Option<String>,
    pub batch_size: Option<usize>,
    pub max_pages: Option<u32>,
}

impl UrbanfluxConfig {
    /// Load configuration with layered resolution rooted at `root`.
    ///
    /// An explicit `config_file` in the overrides replaces the project file.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                Self::merge_toml_file(&mut config, &user_config_path)?;
            }
        }

        // Layer 3: project config, or the file named on the command line
        match cli_overrides.and_then(|cli| cli.config_file.as_ref()) {
            Some(explicit) => Self::merge_toml_file(&mut config, explicit)?,
            None => {
                let project_config_path = root.join("urbanflux.toml");
                if project_config_path.exists() {
                    Self::merge_toml_file(&mut config, &project_config_path)?;
                }
            }
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &UrbanfluxConfig) -> Result<(), ConfigError> {
        if let Some(batch) = config.analysis.batch_size {
            if batch == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "analysis.batch_size".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if let Some(res) = config.analysis.hex_resolution {
            if !(defaults::MIN_HEX_RESOLUTION..=defaults::MAX_HEX_RESOLUTION).contains(&res) {
                return Err(ConfigError::ValidationFailed {
                    field: "analysis.hex_resolution".to_string(),
                    message: format!(
                        "must be between {} and {}",
                        defaults::MIN_HEX_RESOLUTION,
                        defaults::MAX_HEX_RESOLUTION
                    ),
                });
            }
        }
        if let Some(secs) = config.sources.request_timeout_secs {
            if secs == 0 || secs > defaults::MAX_REQUEST_TIMEOUT_SECS {
                return Err(ConfigError::ValidationFailed {
                    field: "sources.request_timeout_secs".to_string(),
                    message: format!(
                        "must be between 1 and {}",
                        defaults::MAX_REQUEST_TIMEOUT_SECS
                    ),
                });
            }
        }
        if config.sources.max_pages == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "sources.max_pages".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        config.enabled_sources().map(|_| ())
    }

    /// Sources selected by `sources.enabled`, in canonical order. Empty = all.
    pub fn enabled_sources(&self) -> Result<Vec<Source>, ConfigError> {
        if self.sources.enabled.is_empty() {
            return Ok(Source::ALL.to_vec());
        }
        let mut selected = Vec::with_capacity(self.sources.enabled.len());
        for name in &self.sources.enabled {
            let source = Source::from_str(name.trim()).map_err(|_| {
                ConfigError::UnknownSource { name: name.clone() }
            })?;
            if !selected.contains(&source) {
                selected.push(source);
            }
        }
        selected.sort();
        Ok(selected)
    }

    /// Returns the user config path: `~/.urbanflux/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".urbanflux").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut UrbanfluxConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: UrbanfluxConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a value.
    fn merge(base: &mut UrbanfluxConfig, other: &UrbanfluxConfig) {
        // Storage
        if other.storage.db_path.is_some() {
            base.storage.db_path = other.storage.db_path.clone();
        }
        if other.storage.busy_timeout_ms.is_some() {
            base.storage.busy_timeout_ms = other.storage.busy_timeout_ms;
        }
        if other.storage.read_pool_size.is_some() {
            base.storage.read_pool_size = other.storage.read_pool_size;
        }

        // Sources
        if other.sources.base_url.is_some() {
            base.sources.base_url = other.sources.base_url.clone();
        }
        if other.sources.app_token.is_some() {
            base.sources.app_token = other.sources.app_token.clone();
        }
        if other.sources.request_timeout_secs.is_some() {
            base.sources.request_timeout_secs = other.sources.request_timeout_secs;
        }
        if !other.sources.enabled.is_empty() {
            base.sources.enabled = other.sources.enabled.clone();
        }
        if other.sources.max_pages.is_some() {
            base.sources.max_pages = other.sources.max_pages;
        }

        // Analysis
        if other.analysis.batch_size.is_some() {
            base.analysis.batch_size = other.analysis.batch_size;
        }
        if other.analysis.hex_resolution.is_some() {
            base.analysis.hex_resolution = other.analysis.hex_resolution;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `URBANFLUX_DB_PATH`, `URBANFLUX_APP_TOKEN`, etc.
    fn apply_env_overrides(config: &mut UrbanfluxConfig) {
        if let Ok(val) = std::env::var("URBANFLUX_DB_PATH") {
            config.storage.db_path = Some(val);
        }
        if let Ok(val) = std::env::var("URBANFLUX_BASE_URL") {
            config.sources.base_url = Some(val);
        }
        if let Ok(val) = std::env::var("URBANFLUX_APP_TOKEN") {
            if !val.trim().is_empty() {
                config.sources.app_token = Some(val);
            }
        }
        if let Ok(val) = std::env::var("URBANFLUX_REQUEST_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.sources.request_timeout_secs = Some(v);
            }
        }
        if let Ok(val) = std::env::var("URBANFLUX_ANALYSIS_BATCH_SIZE") {
            if let Ok(v) = val.parse::<usize>() {
                config.analysis.batch_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("URBANFLUX_HEX_RESOLUTION") {
            if let Ok(v) = val.parse::<u8>() {
                config.analysis.hex_resolution = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut UrbanfluxConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.db_path {
            config.storage.db_path = Some(v.clone());
        }
        if let Some(ref v) = cli.app_token {
            config.sources.app_token = Some(v.clone());
        }
        if let Some(v) = cli.batch_size {
            config.analysis.batch_size = Some(v);
        }
        if let Some(v) = cli.max_pages {
            config.sources.max_pages = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
