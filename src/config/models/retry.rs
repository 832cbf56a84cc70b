//! Retry and timeout configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-attempt deadline and backoff policy for remote calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Deadline for one attempt
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Total attempts, first call included
    #[serde(default = "default_max_attempts", alias = "max_retries")]
    pub max_attempts: u32,
    /// Delay before the first retry; doubles each retry
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Cap on the exponential part of the delay
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Upper bound of the uniform jitter added to every delay
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter_ms: default_jitter_ms(),
        }
    }
}

impl RetryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
