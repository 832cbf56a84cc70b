//! Content-addressed response cache
//!
//! Identical requests are answered from previously generated artifacts
//! without touching the quota, the concurrency gate or the remote API.

mod cache;
mod key;
mod types;


pub use cache::ContentCache;
pub use key::{CacheKey, canonical_request};
pub use types::{AtomicCacheStats, CacheEntry, CacheStats};
