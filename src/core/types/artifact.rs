//! Artifacts returned to callers

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Durable handle to an artifact held by an artifact store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactLocation(pub String);

impl ArtifactLocation {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a successful generation
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Bytes,
    pub mime_type: String,
    pub location: ArtifactLocation,
    /// True when served from the content cache without remote work
    pub from_cache: bool,
}

impl Artifact {
    /// Interpret the artifact as UTF-8 text
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .field("location", &self.location)
            .field("from_cache", &self.from_cache)
            .finish()
    }
}
