//! Executor configuration.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors in executor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("jitter range is inverted: {min_ms}ms > {max_ms}ms")]
    InvertedJitter { min_ms: u64, max_ms: u64 },

    #[error("invalid executor configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Retry settings for [`crate::unit_of_work::Executor`].
///
/// Missing fields take their defaults, so `{}` is a valid configuration.
///
/// ```rust
/// use stategate::unit_of_work::ExecutorConfig;
///
/// let config = ExecutorConfig::from_json(r#"{"max_attempts": 3}"#).unwrap();
/// assert_eq!(config.max_attempts, 3);
/// assert_eq!(config.jitter_max_ms, 10);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Attempts per call to `run`. 1 disables retry.
    pub max_attempts: usize,
    /// Lower bound of the pause between attempts.
    pub jitter_min_ms: u64,
    /// Upper bound (inclusive) of the pause between attempts.
    pub jitter_max_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            jitter_min_ms: 1,
            jitter_max_ms: 10,
        }
    }
}

impl ExecutorConfig {
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the pause range. Jitter has millisecond granularity: any
    /// sub-millisecond part of `min` and `max` is dropped.
    pub fn with_jitter(mut self, min: Duration, max: Duration) -> Self {
        self.jitter_min_ms = min.as_millis() as u64;
        self.jitter_max_ms = max.as_millis() as u64;
        self
    }

    /// Parse and validate a JSON configuration object.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.jitter_min_ms > self.jitter_max_ms {
            return Err(ConfigError::InvertedJitter {
                min_ms: self.jitter_min_ms,
                max_ms: self.jitter_max_ms,
            });
        }
        Ok(())
    }

    /// Random pause drawn uniformly from the jitter range.
    pub(crate) fn jitter(&self) -> Duration {
        let (low, high) = if self.jitter_min_ms <= self.jitter_max_ms {
            (self.jitter_min_ms, self.jitter_max_ms)
        } else {
            (self.jitter_max_ms, self.jitter_min_ms)
        };
        Duration::from_millis(rand::thread_rng().gen_range(low..=high))
    }
}
