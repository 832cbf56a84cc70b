//! Configuration loading utilities
//!
//! Environment variables override file values. Only the variables listed in
//! [`ENV_VARS`] are consulted.

use super::models::*;
use crate::utils::error::{GatewayError, Result};
use std::str::FromStr;
use tracing::debug;

/// Environment variables understood by the gateway
pub const ENV_VARS: &[&str] = &[
    "GEMINI_API_KEY",
    "GATEWAY_BASE_URL",
    "GATEWAY_IMAGE_UNITS_PER_MINUTE",
    "GATEWAY_REQUESTS_PER_DAY",
    "GATEWAY_REFUND_ON_FATAL",
    "GATEWAY_USAGE_STATE",
    "GATEWAY_MAX_IN_FLIGHT",
    "GATEWAY_TIMEOUT_MS",
    "GATEWAY_MAX_RETRIES",
    "GATEWAY_BASE_DELAY_MS",
    "GATEWAY_CACHE_DIR",
    "GATEWAY_LOG_LEVEL",
];

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| GatewayError::Config(format!("Invalid {}: {}", key, e)))
}

impl GatewayConfig {
    /// Apply `KEY=value` overrides, typically `std::env::vars()`
    pub fn apply_overrides<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.as_str() {
                "GEMINI_API_KEY" => self.provider.api_key = value,
                "GATEWAY_BASE_URL" => self.provider.base_url = value,
                "GATEWAY_IMAGE_UNITS_PER_MINUTE" => {
                    self.quota.image_units_per_minute = parse(&key, &value)?
                }
                "GATEWAY_REQUESTS_PER_DAY" => self.quota.requests_per_day = parse(&key, &value)?,
                "GATEWAY_REFUND_ON_FATAL" => {
                    self.quota.refund_on_fatal_failure = parse(&key, &value)?
                }
                "GATEWAY_USAGE_STATE" => self.quota.state_path = Some(value),
                "GATEWAY_MAX_IN_FLIGHT" => {
                    self.concurrency.max_in_flight = parse(&key, &value)?
                }
                "GATEWAY_TIMEOUT_MS" => self.retry.timeout_ms = parse(&key, &value)?,
                "GATEWAY_MAX_RETRIES" => self.retry.max_attempts = parse(&key, &value)?,
                "GATEWAY_BASE_DELAY_MS" => self.retry.base_delay_ms = parse(&key, &value)?,
                "GATEWAY_CACHE_DIR" => {
                    self.cache.storage_type = ArtifactStorageType::Local;
                    self.cache.local_path = value;
                }
                "GATEWAY_LOG_LEVEL" => self.logging.level = value,
                _ => continue,
            }
            debug!("Applied configuration override from {}", key);
        }
        Ok(())
    }
}
