//! Quota configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Local usage quota: per-minute image units and per-day requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Image units admitted per 60s window
    #[serde(default = "default_units_per_minute")]
    pub image_units_per_minute: u32,
    /// Requests of any kind admitted per 24h window
    #[serde(default = "default_requests_per_day")]
    pub requests_per_day: u32,
    /// Units one image request draws from the per-minute window
    #[serde(default = "default_image_unit_cost")]
    pub image_unit_cost: u32,
    /// Give the reservation back when the remote call fails fatally
    #[serde(default)]
    pub refund_on_fatal_failure: bool,
    /// Where usage windows are persisted between runs (not persisted when unset)
    #[serde(default)]
    pub state_path: Option<String>,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            image_units_per_minute: default_units_per_minute(),
            requests_per_day: default_requests_per_day(),
            image_unit_cost: default_image_unit_cost(),
            refund_on_fatal_failure: false,
            state_path: None,
        }
    }
}
