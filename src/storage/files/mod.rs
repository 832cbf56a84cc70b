//! Artifact storage
//!
//! Backends that hold generated artifacts by name. Names are content
//! fingerprints, so a store never needs to overwrite an existing artifact.

mod local;
mod memory;
mod types;

pub use local::LocalArtifactStore;
pub use memory::MemoryArtifactStore;
pub use types::{ArtifactMetadata, ArtifactStore, StoredArtifact, extension_for_mime};

use crate::config::{ArtifactStorageType, CacheConfig};
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::info;

/// Build the artifact store selected by configuration
pub async fn create_artifact_store(config: &CacheConfig) -> Result<Arc<dyn ArtifactStore>> {
    let store: Arc<dyn ArtifactStore> = match config.storage_type {
        ArtifactStorageType::Memory => Arc::new(MemoryArtifactStore::new()),
        ArtifactStorageType::Local => Arc::new(LocalArtifactStore::new(&config.local_path).await?),
    };
    info!("Artifact store initialized: {}", store.backend());
    Ok(store)
}
