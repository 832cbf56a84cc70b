//! Local file system artifact storage
//!
//! Layout: `<base>/<name[0..2]>/<name>.<ext>` with a `<name>.meta` JSON
//! sidecar next to it. The sidecar is written last and is what `locate`
//! looks for, so a half-written artifact is never reported as present.

use super::types::{
    ArtifactMetadata, ArtifactStore, StoredArtifact, extension_for_mime, validate_name,
};
use crate::core::types::ArtifactLocation;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Artifact store on the local file system
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    base_path: PathBuf,
}

impl LocalArtifactStore {
    /// Create a new local store, creating the base directory if needed
    pub async fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let path = base_path.as_ref().to_path_buf();

        fs::create_dir_all(&path).await.map_err(|e| {
            GatewayError::storage(format!("Failed to create storage directory: {}", e))
        })?;

        info!("Local artifact storage initialized at: {}", path.display());
        Ok(Self { base_path: path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the artifact bytes for a given name and MIME type
    fn artifact_path(&self, name: &str, mime_type: &str) -> PathBuf {
        self.shard_dir(name)
            .join(format!("{}.{}", name, extension_for_mime(mime_type)))
    }

    /// Path of the metadata sidecar for a given name
    fn metadata_path(&self, name: &str) -> PathBuf {
        self.shard_dir(name).join(format!("{}.meta", name))
    }

    // First two characters as subdirectory for better distribution
    fn shard_dir(&self, name: &str) -> PathBuf {
        self.base_path.join(&name[..2])
    }

    /// Write via a temporary sibling and rename into place
    async fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
        let tmp = path.with_extension(format!("tmp-{}", Uuid::new_v4()));
        fs::write(&tmp, content)
            .await
            .map_err(|e| GatewayError::storage(format!("Failed to write file: {}", e)))?;

        if let Err(e) = fs::rename(&tmp, path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(GatewayError::storage(format!(
                "Failed to move file into place: {}",
                e
            )));
        }
        Ok(())
    }

    async fn read_metadata(&self, name: &str) -> Result<Option<ArtifactMetadata>> {
        let content = match fs::read_to_string(self.metadata_path(name)).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(GatewayError::storage(format!(
                    "Failed to read metadata: {}",
                    e
                )));
            }
        };

        let metadata = serde_json::from_str(&content)
            .map_err(|e| GatewayError::storage(format!("Failed to parse metadata: {}", e)))?;
        Ok(Some(metadata))
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn store(&self, name: &str, bytes: &Bytes, mime_type: &str) -> Result<ArtifactLocation> {
        validate_name(name)?;

        if let Some(existing) = self.locate(name).await? {
            debug!("Artifact already present: {}", name);
            return Ok(existing.location);
        }

        fs::create_dir_all(self.shard_dir(name))
            .await
            .map_err(|e| GatewayError::storage(format!("Failed to create directory: {}", e)))?;

        let artifact_path = self.artifact_path(name, mime_type);
        Self::write_atomic(&artifact_path, bytes).await?;

        let metadata = ArtifactMetadata::new(name, bytes, mime_type);
        let content = serde_json::to_vec_pretty(&metadata).map_err(|e| {
            GatewayError::storage(format!("Failed to serialize metadata: {}", e))
        })?;
        Self::write_atomic(&self.metadata_path(name), &content).await?;

        debug!(
            "Artifact stored: {} -> {} ({} bytes)",
            name,
            artifact_path.display(),
            bytes.len()
        );
        Ok(ArtifactLocation::new(artifact_path.display().to_string()))
    }

    async fn read(&self, location: &ArtifactLocation) -> Result<Bytes> {
        let path = Path::new(location.as_str());
        let escapes = path
            .components()
            .any(|component| matches!(component, Component::ParentDir));
        if escapes || !path.starts_with(&self.base_path) {
            return Err(GatewayError::storage(format!(
                "Location outside artifact store: {}",
                location
            )));
        }

        let content = fs::read(path)
            .await
            .map_err(|e| GatewayError::storage(format!("Failed to read artifact {}: {}", location, e)))?;
        Ok(Bytes::from(content))
    }

    async fn locate(&self, name: &str) -> Result<Option<StoredArtifact>> {
        validate_name(name)?;

        let Some(metadata) = self.read_metadata(name).await? else {
            return Ok(None);
        };

        let path = self.artifact_path(name, &metadata.mime_type);
        if !fs::try_exists(&path).await.unwrap_or(false) {
            warn!("Metadata without artifact bytes: {}", name);
            return Ok(None);
        }

        Ok(Some(StoredArtifact {
            location: ArtifactLocation::new(path.display().to_string()),
            metadata,
        }))
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}
