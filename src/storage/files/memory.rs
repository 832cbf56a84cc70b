//! In-process artifact storage

use super::types::{ArtifactMetadata, ArtifactStore, StoredArtifact, validate_name};
use crate::core::types::ArtifactLocation;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

const SCHEME: &str = "memory://";

#[derive(Debug, Clone)]
struct MemoryEntry {
    bytes: Bytes,
    metadata: ArtifactMetadata,
}

/// Artifact store backed by process memory; contents are lost on restart
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    entries: DashMap<String, MemoryEntry>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn location_of(name: &str) -> ArtifactLocation {
        ArtifactLocation::new(format!("{}{}", SCHEME, name))
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn store(&self, name: &str, bytes: &Bytes, mime_type: &str) -> Result<ArtifactLocation> {
        validate_name(name)?;

        match self.entries.entry(name.to_string()) {
            Entry::Occupied(_) => {
                debug!("Artifact already present: {}", name);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(MemoryEntry {
                    bytes: bytes.clone(),
                    metadata: ArtifactMetadata::new(name, bytes, mime_type),
                });
                debug!("Artifact stored in memory: {} ({} bytes)", name, bytes.len());
            }
        }

        Ok(Self::location_of(name))
    }

    async fn read(&self, location: &ArtifactLocation) -> Result<Bytes> {
        let name = location
            .as_str()
            .strip_prefix(SCHEME)
            .ok_or_else(|| GatewayError::storage(format!("Not a memory location: {}", location)))?;

        self.entries
            .get(name)
            .map(|entry| entry.bytes.clone())
            .ok_or_else(|| GatewayError::storage(format!("Artifact not found: {}", location)))
    }

    async fn locate(&self, name: &str) -> Result<Option<StoredArtifact>> {
        validate_name(name)?;
        Ok(self.entries.get(name).map(|entry| StoredArtifact {
            location: Self::location_of(name),
            metadata: entry.metadata.clone(),
        }))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
