//! Gateway counters and call phases

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Where a call is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallPhase {
    Validating,
    CacheCheck,
    QuotaCheck,
    AwaitingSlot,
    Executing,
    Cached,
    Failed,
}

impl fmt::Display for CallPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::CacheCheck => "cache_check",
            Self::QuotaCheck => "quota_check",
            Self::AwaitingSlot => "awaiting_slot",
            Self::Executing => "executing",
            Self::Cached => "cached",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Lock-free gateway counters
#[derive(Debug, Default)]
pub struct GatewayStats {
    pub requests: AtomicU64,
    pub validation_rejections: AtomicU64,
    pub cache_hits: AtomicU64,
    pub cache_misses: AtomicU64,
    pub quota_rejections: AtomicU64,
    /// Admitted calls that reached the executor
    pub remote_calls: AtomicU64,
    /// Individual remote attempts, retries included
    pub remote_attempts: AtomicU64,
    pub remote_successes: AtomicU64,
    pub remote_failures: AtomicU64,
    pub refunds: AtomicU64,
}

/// Point-in-time copy of [`GatewayStats`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayStatsSnapshot {
    pub requests: u64,
    pub validation_rejections: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub quota_rejections: u64,
    pub remote_calls: u64,
    pub remote_attempts: u64,
    pub remote_successes: u64,
    pub remote_failures: u64,
    pub refunds: u64,
}

impl GatewayStats {
    pub(super) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> GatewayStatsSnapshot {
        GatewayStatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            validation_rejections: self.validation_rejections.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            quota_rejections: self.quota_rejections.load(Ordering::Relaxed),
            remote_calls: self.remote_calls.load(Ordering::Relaxed),
            remote_attempts: self.remote_attempts.load(Ordering::Relaxed),
            remote_successes: self.remote_successes.load(Ordering::Relaxed),
            remote_failures: self.remote_failures.load(Ordering::Relaxed),
            refunds: self.refunds.load(Ordering::Relaxed),
        }
    }
}
