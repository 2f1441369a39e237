//! Pipeline configuration
//!
//! [`PipelineConfig`] carries every tunable of a run. It starts from
//! defaults, can be loaded from a YAML file, and is then overridden from
//! environment variables. The resolved value is passed to the pipeline
//! explicitly; nothing here writes to the process environment.

use crate::connectors::JAFFLE_SHOP_API_BASE;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming a YAML config file
pub const ENV_CONFIG_FILE: &str = "JAFFLE_CONFIG";
/// Environment variable overriding the extract worker count
pub const ENV_EXTRACT_WORKERS: &str = "EXTRACT__WORKERS";
/// Environment variable overriding the normalize worker count
pub const ENV_NORMALIZE_WORKERS: &str = "NORMALIZE__WORKERS";
/// Environment variable overriding the load worker count
pub const ENV_LOAD_WORKERS: &str = "LOAD__WORKERS";
/// Environment variable overriding the API base URL
pub const ENV_API_BASE: &str = "JAFFLE_API_BASE";
/// Environment variable overriding the page size
pub const ENV_PAGE_SIZE: &str = "JAFFLE_PAGE_SIZE";
/// Environment variable overriding the working directory
pub const ENV_WORKING_DIR: &str = "JAFFLE_WORKING_DIR";

// ============================================================================
// Top-Level Pipeline Config
// ============================================================================

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pipeline name; also names the DuckDB file and staging directory
    #[serde(default = "default_pipeline_name")]
    pub pipeline_name: String,

    /// Destination schema holding the loaded tables
    #[serde(default = "default_dataset_name")]
    pub dataset_name: String,

    /// Directory for the database file and load packages
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    /// Base URL of the upstream API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Records requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Worker counts per stage
    #[serde(default)]
    pub workers: WorkerConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pipeline_name: default_pipeline_name(),
            dataset_name: default_dataset_name(),
            working_dir: default_working_dir(),
            api_base: default_api_base(),
            page_size: default_page_size(),
            workers: WorkerConfig::default(),
            http: HttpSettings::default(),
        }
    }
}

fn default_pipeline_name() -> String {
    "jaffle_shop".to_string()
}

fn default_dataset_name() -> String {
    "jaffle_shop_data".to_string()
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_api_base() -> String {
    JAFFLE_SHOP_API_BASE.to_string()
}

fn default_page_size() -> u32 {
    100
}

// ============================================================================
// Workers
// ============================================================================

/// Concurrency of each pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Resources extracted concurrently
    #[serde(default = "default_extract_workers")]
    pub extract: usize,

    /// Pages normalized concurrently
    #[serde(default = "default_normalize_workers")]
    pub normalize: usize,

    /// Tables loaded concurrently
    #[serde(default = "default_load_workers")]
    pub load: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            extract: default_extract_workers(),
            normalize: default_normalize_workers(),
            load: default_load_workers(),
        }
    }
}

fn default_extract_workers() -> usize {
    3
}

fn default_normalize_workers() -> usize {
    std::thread::available_parallelism().map_or(2, std::num::NonZeroUsize::get)
}

fn default_load_workers() -> usize {
    5
}

// ============================================================================
// HTTP
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for transient failures (429, 5xx, timeouts)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff between retries
    #[serde(default)]
    pub backoff: BackoffSettings,

    /// Optional client-side request rate limit
    #[serde(default)]
    pub requests_per_second: Option<u32>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff: BackoffSettings::default(),
            requests_per_second: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

/// Backoff configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffSettings {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffSettings {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    100
}

fn default_max_ms() -> u64 {
    60000
}

// ============================================================================
// Loading
// ============================================================================

impl PipelineConfig {
    /// Parse a config from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a config from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Resolve the config from the process environment
    pub fn from_env() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Resolve the config through an environment lookup
    ///
    /// Reads the YAML file named by `JAFFLE_CONFIG` if set, applies the
    /// environment overrides and validates the result.
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match lookup(ENV_CONFIG_FILE) {
            Some(path) if !path.trim().is_empty() => Self::from_yaml_file(path.trim())?,
            _ => Self::default(),
        };

        let config = base.apply_env_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides on top of this config
    pub fn apply_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(n) = parse_var(&lookup, ENV_EXTRACT_WORKERS)? {
            self.workers.extract = n;
        }
        if let Some(n) = parse_var(&lookup, ENV_NORMALIZE_WORKERS)? {
            self.workers.normalize = n;
        }
        if let Some(n) = parse_var(&lookup, ENV_LOAD_WORKERS)? {
            self.workers.load = n;
        }
        if let Some(n) = parse_var(&lookup, ENV_PAGE_SIZE)? {
            self.page_size = n;
        }
        if let Some(base) = non_empty(&lookup, ENV_API_BASE) {
            self.api_base = base;
        }
        if let Some(dir) = non_empty(&lookup, ENV_WORKING_DIR) {
            self.working_dir = PathBuf::from(dir);
        }
        Ok(self)
    }

    /// Check the config for values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.pipeline_name.trim().is_empty() {
            return Err(Error::invalid_value("pipeline_name", "must not be empty"));
        }
        if self.dataset_name.trim().is_empty() {
            return Err(Error::invalid_value("dataset_name", "must not be empty"));
        }
        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be at least 1"));
        }
        for (field, value) in [
            ("workers.extract", self.workers.extract),
            ("workers.normalize", self.workers.normalize),
            ("workers.load", self.workers.load),
        ] {
            if value == 0 {
                return Err(Error::invalid_value(field, "must be at least 1"));
            }
        }
        if self.http.requests_per_second == Some(0) {
            return Err(Error::invalid_value(
                "http.requests_per_second",
                "must be at least 1",
            ));
        }
        url::Url::parse(&self.api_base)
            .map_err(|e| Error::invalid_value("api_base", e.to_string()))?;
        Ok(())
    }

    /// Path of the DuckDB database file
    pub fn destination_path(&self) -> PathBuf {
        self.working_dir.join(format!("{}.duckdb", self.pipeline_name))
    }

    /// Directory holding this pipeline's load packages
    pub fn pipeline_dir(&self) -> PathBuf {
        self.working_dir.join(&self.pipeline_name)
    }

    /// HTTP client configuration for the upstream API
    pub fn to_client_config(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder()
            .base_url(&self.api_base)
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .max_retries(self.http.max_retries)
            .backoff(
                self.http.backoff.backoff_type,
                Duration::from_millis(self.http.backoff.initial_ms),
                Duration::from_millis(self.http.backoff.max_ms),
            )
            .header("Accept", "application/json");

        let builder = match self.http.requests_per_second {
            Some(rps) => builder.rate_limit(RateLimiterConfig::new(rps, rps)),
            None => builder.no_rate_limit(),
        };
        builder.build()
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    non_empty(lookup, key)
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| Error::invalid_value(key, format!("'{v}': {e}")))
        })
        .transpose()
}
