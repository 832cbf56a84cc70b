//! Content cache type definitions

use super::key::CacheKey;
use crate::core::types::{Artifact, ArtifactLocation};
use bytes::Bytes;
use std::sync::atomic::{AtomicU64, Ordering};

/// An immutable cached artifact
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub bytes: Bytes,
    pub mime_type: String,
    pub location: ArtifactLocation,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl CacheEntry {
    /// Size used for hot tier weighting
    pub fn weight(&self) -> u32 {
        u32::try_from(self.bytes.len()).unwrap_or(u32::MAX)
    }

    pub fn into_artifact(self, from_cache: bool) -> Artifact {
        Artifact {
            bytes: self.bytes,
            mime_type: self.mime_type,
            location: self.location,
            from_cache,
        }
    }
}

/// Cache statistics using atomic counters for lock-free updates
#[derive(Debug, Default)]
pub struct AtomicCacheStats {
    /// Hits served from memory
    pub hot_hits: AtomicU64,
    /// Hits served from the artifact store
    pub store_hits: AtomicU64,
    pub misses: AtomicU64,
    /// Artifacts written
    pub writes: AtomicU64,
    /// Lookups that failed in the artifact store and were treated as misses
    pub store_errors: AtomicU64,
}

/// Cache statistics snapshot (returned to callers)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hot_hits: u64,
    pub store_hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub store_errors: u64,
}

impl CacheStats {
    pub fn hits(&self) -> u64 {
        self.hot_hits + self.store_hits
    }

    /// Hit rate in percent
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits() + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64 * 100.0
        }
    }
}

impl AtomicCacheStats {
    /// Create a snapshot of current stats
    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            hot_hits: self.hot_hits.load(Ordering::Relaxed),
            store_hits: self.store_hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            store_errors: self.store_errors.load(Ordering::Relaxed),
        }
    }
}
