//! Configuration loading and defaults for ecoprompt.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_ENDPOINT_URL: &str = "http://127.0.0.1:8000/analise";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// === Types ===

/// Raw retry configuration loaded from config files.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: Option<u32>,
    pub initial_delay: Option<f64>,
    pub max_delay: Option<f64>,
    pub exponential_base: Option<f64>,
}

/// Resolved retry policy with defaults applied.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per submission, the first one included.
    pub max_attempts: u32,
    /// Delay before the first retry, in seconds.
    pub initial_delay: f64,
    /// Upper bound on any single delay, in seconds.
    pub max_delay: f64,
    pub exponential_base: f64,
}

impl RetryPolicy {
    /// Compute the backoff delay after a failed attempt (0-based index).
    ///
    /// With the defaults this yields 1s, 2s, 4s, ... with no jitter.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let delay = self.initial_delay * self.exponential_base.powi(exponent);
        let delay = delay.min(self.max_delay);
        // Clamp to a sane range to guard against NaN/negative from misconfigured values
        let delay = delay.clamp(0.0, 300.0);
        Duration::from_secs_f64(delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: 1.0,
            max_delay: 60.0,
            exponential_base: 2.0,
        }
    }
}

/// Resolved CLI configuration, including defaults and environment overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub endpoint_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub retry: Option<RetryConfig>,
}

// === Config Loading ===

impl Config {
    /// Load configuration from disk and merge with environment overrides.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let path = resolve_load_config_path(path);
        let mut config = if let Some(path) = path.as_ref() {
            if path.exists() {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                toml::from_str(&contents)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?
            } else {
                Config::default()
            }
        } else {
            Config::default()
        };

        apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Validate that configured fields are usable.
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = self.endpoint_url.as_deref() {
            if url.trim().is_empty() {
                anyhow::bail!("endpoint_url cannot be an empty string");
            }
            reqwest::Url::parse(url)
                .with_context(|| format!("Invalid endpoint_url '{url}'"))?;
        }
        if let Some(secs) = self.request_timeout_secs
            && secs == 0
        {
            anyhow::bail!("request_timeout_secs must be at least 1");
        }
        if let Some(retry) = &self.retry
            && let Some(attempts) = retry.max_attempts
            && attempts == 0
        {
            anyhow::bail!("retry.max_attempts must be at least 1");
        }
        Ok(())
    }

    /// Return the analysis endpoint URL (normalized, default applied).
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        let url = self
            .endpoint_url
            .clone()
            .unwrap_or_else(|| DEFAULT_ENDPOINT_URL.to_string());
        url.trim().trim_end_matches('/').to_string()
    }

    /// Return the per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Resolve the effective retry policy with defaults applied.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();

        let Some(cfg) = &self.retry else {
            return defaults;
        };

        RetryPolicy {
            max_attempts: cfg.max_attempts.unwrap_or(defaults.max_attempts).max(1),
            initial_delay: cfg.initial_delay.unwrap_or(defaults.initial_delay),
            max_delay: cfg.max_delay.unwrap_or(defaults.max_delay),
            exponential_base: cfg.exponential_base.unwrap_or(defaults.exponential_base),
        }
    }
}

// === Defaults ===

fn home_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ecoprompt").join("config.toml"))
}

fn env_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("ECOPROMPT_CONFIG_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(expand_path(trimmed));
        }
    }
    None
}

fn resolve_load_config_path(path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = path {
        if let Some(raw) = path.to_str() {
            return Some(expand_path(raw));
        }
        return Some(path);
    }

    env_config_path().or_else(home_config_path)
}

fn expand_path(path: &str) -> PathBuf {
    let expanded = shellexpand::tilde(path);
    PathBuf::from(expanded.as_ref())
}

// === Environment Overrides ===

fn apply_env_overrides(config: &mut Config) {
    if let Ok(value) = std::env::var("ECOPROMPT_ENDPOINT_URL")
        && !value.trim().is_empty()
    {
        config.endpoint_url = Some(value);
    }
    if let Ok(value) = std::env::var("ECOPROMPT_TIMEOUT_SECS")
        && let Ok(parsed) = value.parse::<u64>()
    {
        config.request_timeout_secs = Some(parsed);
    }
}
