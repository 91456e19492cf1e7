//! Queue configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`QueueConfig::max_concurrency`].
pub const ENV_MAX_CONCURRENCY: &str = "JOB_QUEUE_MAX_CONCURRENCY";
/// Environment variable overriding [`QueueConfig::default_timeout_ms`].
pub const ENV_DEFAULT_TIMEOUT_MS: &str = "JOB_QUEUE_DEFAULT_TIMEOUT_MS";
/// Environment variable overriding [`QueueConfig::default_max_retries`].
pub const ENV_DEFAULT_MAX_RETRIES: &str = "JOB_QUEUE_DEFAULT_MAX_RETRIES";
/// Environment variable overriding [`QueueConfig::backoff_base_ms`].
pub const ENV_BACKOFF_BASE_MS: &str = "JOB_QUEUE_BACKOFF_BASE_MS";

/// Scalar configuration for a job queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Maximum number of attempts in flight at once.
    pub max_concurrency: usize,
    /// Per-attempt timeout in milliseconds when a task does not override it.
    pub default_timeout_ms: u64,
    /// Attempt budget when a task does not override it.
    pub default_max_retries: u32,
    /// Base backoff delay in milliseconds; doubles with each further attempt.
    pub backoff_base_ms: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_concurrency: num_cpus::get().max(1),
            default_timeout_ms: 30_000,
            default_max_retries: 3,
            backoff_base_ms: 1_000,
        }
    }
}

impl QueueConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be greater than 0".into());
        }
        if self.default_timeout_ms == 0 {
            return Err("default_timeout_ms must be greater than 0".into());
        }
        if self.backoff_base_ms == 0 {
            return Err("backoff_base_ms must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate. Missing fields
    /// take their defaults.
    ///
    /// # Errors
    ///
    /// Returns a message on parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the environment, reading a `.env` file first
    /// if one exists. Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a message if a variable does not parse or the result is invalid.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        let mut cfg = Self::default();
        if let Some(v) = read_env(ENV_MAX_CONCURRENCY)? {
            cfg.max_concurrency = v;
        }
        if let Some(v) = read_env(ENV_DEFAULT_TIMEOUT_MS)? {
            cfg.default_timeout_ms = v;
        }
        if let Some(v) = read_env(ENV_DEFAULT_MAX_RETRIES)? {
            cfg.default_max_retries = v;
        }
        if let Some(v) = read_env(ENV_BACKOFF_BASE_MS)? {
            cfg.backoff_base_ms = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Default per-attempt timeout.
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    /// Base backoff delay.
    #[must_use]
    pub const fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }
}

fn read_env<V: std::str::FromStr>(key: &str) -> Result<Option<V>, String>
where
    V::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| format!("{key}: {e}")),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(format!("{key}: {e}")),
    }
}
