//! Runtime configuration read from the environment.
//!
//! `main` loads `.env.local` (if present) before calling [`SystemConfig::from_env`].

use thiserror::Error;

pub const ENV_CHANNEL_BUFFER: &str = "TAILOR_CHANNEL_BUFFER";
pub const ENV_FEED_CAPACITY: &str = "TAILOR_FEED_CAPACITY";
pub const ENV_LOG: &str = "TAILOR_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemConfig {
    /// Request queue depth of each resource actor.
    pub channel_buffer: usize,
    /// Change notifications buffered per subscriber before it lags.
    pub feed_capacity: usize,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 32,
            feed_capacity: 64,
            log_filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

impl SystemConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            channel_buffer: positive(ENV_CHANNEL_BUFFER, lookup(ENV_CHANNEL_BUFFER), defaults.channel_buffer)?,
            feed_capacity: positive(ENV_FEED_CAPACITY, lookup(ENV_FEED_CAPACITY), defaults.feed_capacity)?,
            log_filter: lookup(ENV_LOG)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.log_filter),
        })
    }
}

fn positive(key: &'static str, value: Option<String>, default: usize) -> Result<usize, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber { key, value }),
    }
}
