//! Quota types

use crate::core::types::{RequestKind, UsageSnapshot};
use serde::{Deserialize, Serialize};

/// Which window refused an admission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaWindow {
    /// Per-minute image units
    Units,
    /// Per-day requests
    Requests,
}

/// Outcome of `QuotaTracker::check_and_reserve`
#[derive(Debug, Clone)]
pub struct Reservation {
    /// Whether the request was admitted and counted
    pub allowed: bool,
    /// Usage after the reservation, or the unincremented usage on refusal
    pub snapshot: UsageSnapshot,
    /// Window that refused the request
    pub exhausted: Option<QuotaWindow>,
    pub(super) kind: RequestKind,
    pub(super) units: u32,
    pub(super) unit_window_start: u64,
    pub(super) request_window_start: u64,
}

impl Reservation {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Units drawn from the per-minute window
    pub fn units(&self) -> u32 {
        self.units
    }
}

/// Persisted form of one window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowState {
    pub start_ms: u64,
    pub count: u32,
}

/// Both windows as written to durable storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedUsage {
    pub units: WindowState,
    pub requests: WindowState,
}
