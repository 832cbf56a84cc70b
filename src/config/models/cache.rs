//! Cache configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Where cached artifacts are persisted
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactStorageType {
    /// Process memory; lost on restart
    #[default]
    Memory,
    /// Local filesystem under `local_path`
    Local,
}

/// Content cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Serve identical requests from the cache
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Artifact storage backend
    #[serde(default)]
    pub storage_type: ArtifactStorageType,
    /// Directory for the local backend
    #[serde(default = "default_artifact_path")]
    pub local_path: String,
    /// Size of the in-memory hot tier in bytes
    #[serde(default = "default_hot_capacity_bytes")]
    pub hot_capacity_bytes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            storage_type: ArtifactStorageType::default(),
            local_path: default_artifact_path(),
            hot_capacity_bytes: default_hot_capacity_bytes(),
        }
    }
}
