//! Configuration structures.
//!
//! Configuration is loaded from environment variables once at startup,
//! validated, and never mutated afterwards.

use crate::tools::ToolCategory;
use crate::types::{Error, Result};
use crate::validation::{
    validate_http_url, validate_log_level, validate_non_empty, validate_positive,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

pub const ENV_API_TOKEN: &str = "SERPSTAT_API_TOKEN";
pub const ENV_API_URL: &str = "SERPSTAT_API_URL";
pub const ENV_REQUEST_TIMEOUT: &str = "SERPSTAT_REQUEST_TIMEOUT";
pub const ENV_MAX_RETRIES: &str = "SERPSTAT_MAX_RETRIES";
pub const ENV_RETRY_DELAY: &str = "SERPSTAT_RETRY_DELAY";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "SERPSTAT_LOG_FORMAT";
pub const ENV_TOOL_CATEGORIES: &str = "SERPSTAT_TOOL_CATEGORIES";

/// Global server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote API access.
    #[serde(default)]
    pub api: ApiConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Which tool categories get registered.
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Serpstat API access and retry policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API token, attached as the `token` query parameter.
    pub token: String,

    /// JSON-RPC endpoint.
    pub base_url: String,

    /// Per-attempt transport timeout. An attempt that exceeds it is transient.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Retries after the first attempt; total attempts = max_retries + 1.
    pub max_retries: u32,

    /// Fixed delay between attempts.
    #[serde(with = "humantime_serde")]
    pub retry_delay: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: "https://api.serpstat.com/v4".to_string(),
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Tool registration toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    pub categories: Vec<ToolCategory>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            categories: ToolCategory::ALL.to_vec(),
        }
    }
}

impl ToolsConfig {
    pub fn is_enabled(&self, category: ToolCategory) -> bool {
        self.categories.contains(&category)
    }
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Unset or blank keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Config::default();

        if let Some(token) = get(ENV_API_TOKEN) {
            config.api.token = token;
        }
        if let Some(url) = get(ENV_API_URL) {
            config.api.base_url = url;
        }
        if let Some(raw) = get(ENV_REQUEST_TIMEOUT) {
            config.api.request_timeout = parse_duration(ENV_REQUEST_TIMEOUT, &raw)?;
        }
        if let Some(raw) = get(ENV_MAX_RETRIES) {
            config.api.max_retries = raw.parse().map_err(|e| {
                Error::config(format!(
                    "{} must be a non-negative integer: {}",
                    ENV_MAX_RETRIES, e
                ))
            })?;
        }
        if let Some(raw) = get(ENV_RETRY_DELAY) {
            config.api.retry_delay = parse_duration(ENV_RETRY_DELAY, &raw)?;
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            config.observability.log_level = level.to_ascii_lowercase();
        }
        if let Some(format) = get(ENV_LOG_FORMAT) {
            config.observability.json_logs = format.eq_ignore_ascii_case("json");
        }
        if let Some(raw) = get(ENV_TOOL_CATEGORIES) {
            config.tools.categories = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToolCategory::from_str)
                .collect::<Result<Vec<_>>>()?;
        }

        Ok(config)
    }

    /// Startup checks. Call once before building the client.
    pub fn validate(&self) -> Result<()> {
        validate_non_empty(&self.api.token, ENV_API_TOKEN)?;
        validate_http_url(&self.api.base_url, ENV_API_URL)?;
        validate_positive(self.api.request_timeout.as_millis(), ENV_REQUEST_TIMEOUT)?;
        validate_log_level(&self.observability.log_level, ENV_LOG_LEVEL)?;
        if self.tools.categories.is_empty() {
            return Err(Error::config(format!(
                "{} enables no tool categories",
                ENV_TOOL_CATEGORIES
            )));
        }
        Ok(())
    }
}

fn parse_duration(key: &str, raw: &str) -> Result<Duration> {
    humantime_serde::re::humantime::parse_duration(raw)
        .map_err(|e| Error::config(format!("{} is not a duration ('{}'): {}", key, raw, e)))
}
