//! Artifact storage types

use crate::core::types::ArtifactLocation;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Metadata kept alongside every stored artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Artifact name (content fingerprint)
    pub name: String,
    /// MIME content type
    pub mime_type: String,
    /// Size in bytes
    pub size: u64,
    /// Creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// SHA-256 of the bytes, hex encoded
    pub checksum: String,
}

impl ArtifactMetadata {
    pub fn new(name: &str, bytes: &[u8], mime_type: &str) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            size: bytes.len() as u64,
            created_at: chrono::Utc::now(),
            checksum: checksum(bytes),
        }
    }
}

/// An artifact known to a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub location: ArtifactLocation,
    pub metadata: ArtifactMetadata,
}

/// Durable artifact storage
#[async_trait]
pub trait ArtifactStore: Send + Sync + std::fmt::Debug {
    /// Persist `bytes` under `name` unless an artifact with that name exists
    ///
    /// Returns the location of the stored (or already present) artifact.
    async fn store(&self, name: &str, bytes: &Bytes, mime_type: &str) -> Result<ArtifactLocation>;

    /// Read an artifact back
    async fn read(&self, location: &ArtifactLocation) -> Result<Bytes>;

    /// Find an artifact by name
    async fn locate(&self, name: &str) -> Result<Option<StoredArtifact>>;

    /// Backend name for logs
    fn backend(&self) -> &'static str;
}

/// Calculate a SHA-256 checksum
pub(super) fn checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Names become path components, so only a conservative alphabet is accepted
pub(super) fn validate_name(name: &str) -> Result<()> {
    if name.len() < 2
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(GatewayError::storage(format!(
            "Invalid artifact name: {:?}",
            name
        )));
    }
    Ok(())
}

/// File extension for a MIME type
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "text/plain" => "txt",
        "text/markdown" => "md",
        "application/json" => "json",
        _ => "bin",
    }
}
