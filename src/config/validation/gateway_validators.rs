//! Gateway configuration validators
//!
//! This module provides validation implementations for the gateway configuration
//! and each of its sections.

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;
use url::Url;

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating gateway configuration");

        self.quota.validate()?;
        self.concurrency.validate()?;
        self.retry.validate()?;
        self.cache.validate()?;
        self.input.validate()?;
        self.provider.validate()?;
        self.logging.validate()?;

        if self.quota.image_unit_cost > self.quota.image_units_per_minute {
            return Err(format!(
                "Image unit cost {} exceeds the per-minute limit {}; no image request could ever be admitted",
                self.quota.image_unit_cost, self.quota.image_units_per_minute
            ));
        }

        debug!("Gateway configuration validation completed");
        Ok(())
    }
}

impl Validate for QuotaConfig {
    fn validate(&self) -> Result<(), String> {
        if self.image_units_per_minute == 0 {
            return Err("Image units per minute must be greater than 0".to_string());
        }

        if self.requests_per_day == 0 {
            return Err("Requests per day must be greater than 0".to_string());
        }

        if self.image_unit_cost == 0 {
            return Err("Image unit cost must be greater than 0".to_string());
        }

        if let Some(path) = &self.state_path {
            if path.trim().is_empty() {
                return Err("Usage state path cannot be empty when set".to_string());
            }
        }

        Ok(())
    }
}

impl Validate for ConcurrencyConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_in_flight == 0 {
            return Err("Max in-flight calls must be greater than 0".to_string());
        }

        if self.max_in_flight > 64 {
            return Err("Max in-flight calls seems too high (>64)".to_string());
        }

        Ok(())
    }
}

impl Validate for RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.timeout_ms == 0 {
            return Err("Attempt timeout must be greater than 0".to_string());
        }

        if self.timeout_ms > 600_000 {
            return Err("Attempt timeout should not exceed 10 minutes".to_string());
        }

        if self.max_attempts == 0 {
            return Err("Max attempts must be at least 1".to_string());
        }

        if self.max_attempts > 10 {
            return Err("Max attempts should not exceed 10".to_string());
        }

        if self.base_delay_ms > self.max_delay_ms {
            return Err(format!(
                "Base delay {}ms cannot exceed max delay {}ms",
                self.base_delay_ms, self.max_delay_ms
            ));
        }

        Ok(())
    }
}

impl Validate for CacheConfig {
    fn validate(&self) -> Result<(), String> {
        if self.storage_type == ArtifactStorageType::Local && self.local_path.trim().is_empty() {
            return Err("Local artifact path cannot be empty".to_string());
        }

        if self.enabled && self.hot_capacity_bytes == 0 {
            return Err("Hot cache capacity must be greater than 0 when caching is enabled".to_string());
        }

        Ok(())
    }
}

impl Validate for InputPolicyConfig {
    fn validate(&self) -> Result<(), String> {
        if self.min_prompt_length > self.max_prompt_length {
            return Err(format!(
                "Min prompt length {} cannot exceed max prompt length {}",
                self.min_prompt_length, self.max_prompt_length
            ));
        }

        if self.max_prompt_length == 0 {
            return Err("Max prompt length must be greater than 0".to_string());
        }

        if self.max_image_bytes == 0 {
            return Err("Max image size must be greater than 0".to_string());
        }

        if self.blocked_terms.iter().any(|term| term.trim().is_empty()) {
            return Err("Blocked terms cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Validate for ProviderConfig {
    fn validate(&self) -> Result<(), String> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| format!("Provider base URL is invalid: {}", e))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(format!(
                    "Provider base URL must use http:// or https:// scheme, got: {}",
                    scheme
                ));
            }
        }

        if self.text_model.trim().is_empty() {
            return Err("Text model cannot be empty".to_string());
        }

        if self.image_model.trim().is_empty() {
            return Err("Image model cannot be empty".to_string());
        }

        if self.connect_timeout == 0 {
            return Err("Connect timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        Ok(())
    }
}
