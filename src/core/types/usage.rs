//! Usage snapshot exposed to callers

use serde::{Deserialize, Serialize};

/// Read-only projection of both quota windows.
///
/// Always recomputable from the tracker; never persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSnapshot {
    /// Image units consumed in the current per-minute window
    pub units_used_in_window: u32,
    pub unit_limit: u32,
    pub units_reset_in_seconds: u64,
    /// Requests made in the current per-day window
    pub requests_used_in_window: u32,
    pub request_limit: u32,
    pub requests_reset_in_seconds: u64,
}

impl UsageSnapshot {
    pub fn images_this_minute(&self) -> u32 {
        self.units_used_in_window
    }

    pub fn minute_reset_in_seconds(&self) -> u64 {
        self.units_reset_in_seconds
    }

    pub fn requests_today(&self) -> u32 {
        self.requests_used_in_window
    }

    pub fn units_remaining(&self) -> u32 {
        self.unit_limit.saturating_sub(self.units_used_in_window)
    }

    pub fn requests_remaining(&self) -> u32 {
        self.request_limit.saturating_sub(self.requests_used_in_window)
    }
}
