//! Storage layer for the Gateway
//!
//! Durable homes for cached artifacts and for the quota windows.

/// Artifact storage backends
pub mod files;
/// Usage window persistence
pub mod usage;

pub use files::{
    ArtifactMetadata, ArtifactStore, LocalArtifactStore, MemoryArtifactStore, StoredArtifact,
    create_artifact_store,
};
pub use usage::UsageStateFile;
