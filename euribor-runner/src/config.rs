//! Pipeline configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration that publishes the 12-month series into `api/`.

use euribor_core::data::http::{DEFAULT_CHART_URL, DEFAULT_REFERER, DEFAULT_SERIES_ID, DEFAULT_USER_AGENT};
use euribor_core::{HttpSourceConfig, SourceFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// First year covered by a full backfill.
pub const DEFAULT_BACKFILL_START_YEAR: i32 = 2012;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Root of the published file tree.
    pub output_dir: PathBuf,
    pub source: SourceConfig,
    pub backfill_start_year: i32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("api"),
            source: SourceConfig::default(),
            backfill_start_year: DEFAULT_BACKFILL_START_YEAR,
        }
    }
}

/// Upstream connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub format: SourceFormat,
    /// Chart-data endpoint, or a page template with `{year}`/`{month}`.
    /// Required for `html`; defaults to the chart endpoint for `highcharts`.
    pub url: Option<String>,
    pub series_id: u32,
    pub referer: Option<String>,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            format: SourceFormat::Highcharts,
            url: None,
            series_id: DEFAULT_SERIES_ID,
            referer: Some(DEFAULT_REFERER.to_string()),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
        }
    }
}

impl PipelineConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Invalid("source.timeout_secs must be > 0".into()));
        }
        if self.source.format == SourceFormat::Html {
            match &self.source.url {
                None => {
                    return Err(ConfigError::Invalid(
                        "source.url is required when source.format = \"html\"".into(),
                    ))
                }
                Some(url) if !url.contains("{year}") || !url.contains("{month}") => {
                    return Err(ConfigError::Invalid(format!(
                        "source.url must contain {{year}} and {{month}} placeholders: {url}"
                    )))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Settings for `euribor_core::HttpSource`.
    pub fn http_source_config(&self) -> HttpSourceConfig {
        let source = &self.source;
        HttpSourceConfig {
            format: source.format,
            url: source
                .url
                .clone()
                .unwrap_or_else(|| DEFAULT_CHART_URL.to_string()),
            series_id: source.series_id,
            referer: source.referer.clone(),
            user_agent: source.user_agent.clone(),
            timeout: Duration::from_secs(source.timeout_secs),
        }
    }
}
