//! Content cache implementation
//!
//! Two tiers: a size-bounded in-memory hot tier (moka) in front of the
//! authoritative artifact store. Entries never expire; the hot tier only
//! evicts to stay within its byte budget.

use super::key::CacheKey;
use super::types::{AtomicCacheStats, CacheEntry, CacheStats};
use crate::config::CacheConfig;
use crate::storage::files::ArtifactStore;
use crate::utils::error::{GatewayError, Result};
use bytes::Bytes;
use moka::future::Cache;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tracing::{debug, warn};

/// Fingerprint → artifact cache
pub struct ContentCache {
    hot: Cache<CacheKey, CacheEntry>,
    store: Arc<dyn ArtifactStore>,
    enabled: bool,
    stats: AtomicCacheStats,
}

impl std::fmt::Debug for ContentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentCache")
            .field("enabled", &self.enabled)
            .field("backend", &self.store.backend())
            .field("hot_entries", &self.hot.entry_count())
            .finish()
    }
}

impl ContentCache {
    /// Create a cache over the given artifact store
    pub fn new(config: &CacheConfig, store: Arc<dyn ArtifactStore>) -> Self {
        let hot = Cache::builder()
            .max_capacity(config.hot_capacity_bytes)
            .weigher(|_key: &CacheKey, entry: &CacheEntry| entry.weight())
            .build();

        Self {
            hot,
            store,
            enabled: config.enabled,
            stats: AtomicCacheStats::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Find a previously generated artifact
    ///
    /// Store failures are logged and reported as a miss.
    pub async fn lookup(&self, key: &CacheKey) -> Option<CacheEntry> {
        if !self.enabled {
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        if let Some(entry) = self.hot.get(key).await {
            self.stats.hot_hits.fetch_add(1, Ordering::Relaxed);
            debug!("Hot cache hit for key: {}", key);
            return Some(entry);
        }

        match self.load_from_store(key).await {
            Ok(Some(entry)) => {
                // Promote to the hot tier
                self.hot.insert(*key, entry.clone()).await;
                self.stats.store_hits.fetch_add(1, Ordering::Relaxed);
                debug!("Artifact store hit for key: {}", key);
                Some(entry)
            }
            Ok(None) => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(e) => {
                self.stats.store_errors.fetch_add(1, Ordering::Relaxed);
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                warn!("Artifact store lookup failed for key {}: {}", key, e);
                None
            }
        }
    }

    async fn load_from_store(&self, key: &CacheKey) -> Result<Option<CacheEntry>> {
        let Some(stored) = self.store.locate(&key.to_hex()).await? else {
            return Ok(None);
        };
        let bytes = self.store.read(&stored.location).await?;

        Ok(Some(CacheEntry {
            key: *key,
            bytes,
            mime_type: stored.metadata.mime_type,
            location: stored.location,
            created_at: stored.metadata.created_at,
        }))
    }

    /// Record a generated artifact under `key`
    ///
    /// Write-once: if the key is already present the existing entry is
    /// returned and `bytes` is discarded. Concurrent stores of the same key
    /// are coalesced into a single write.
    pub async fn store(&self, key: &CacheKey, bytes: Bytes, mime_type: &str) -> Result<CacheEntry> {
        if !self.enabled {
            return self.write_through(key, bytes, mime_type).await;
        }

        let entry = self
            .hot
            .entry(*key)
            .or_try_insert_with(self.write_through(key, bytes, mime_type))
            .await
            .map_err(|e| GatewayError::storage(e.to_string()))?;

        if !entry.is_fresh() {
            debug!("Cache entry already present for key: {}", key);
        }
        Ok(entry.into_value())
    }

    async fn write_through(&self, key: &CacheKey, bytes: Bytes, mime_type: &str) -> Result<CacheEntry> {
        let name = key.to_hex();

        if let Some(stored) = self.store.locate(&name).await? {
            let bytes = self.store.read(&stored.location).await?;
            return Ok(CacheEntry {
                key: *key,
                bytes,
                mime_type: stored.metadata.mime_type,
                location: stored.location,
                created_at: stored.metadata.created_at,
            });
        }

        let location = self.store.store(&name, &bytes, mime_type).await?;
        self.stats.writes.fetch_add(1, Ordering::Relaxed);
        debug!("Artifact cached: {} -> {}", key, location);

        Ok(CacheEntry {
            key: *key,
            bytes,
            mime_type: mime_type.to_string(),
            location,
            created_at: chrono::Utc::now(),
        })
    }

    /// Drop the hot tier; stored artifacts are untouched
    pub fn clear(&self) {
        self.hot.invalidate_all();
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }
}
