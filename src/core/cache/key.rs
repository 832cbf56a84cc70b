//! Request fingerprints
//!
//! A key is the SHA-256 of a canonical JSON rendering of every field that
//! affects the generated artifact. `serde_json::Value` objects keep their keys
//! sorted, so the rendering does not depend on struct field order.

use crate::core::types::{CharacterBlueprint, GenerationRequest, ImageInput};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use std::fmt;

/// Fingerprint of a generation request
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey([u8; 32]);

impl CacheKey {
    /// Fingerprint a request
    pub fn for_request(request: &GenerationRequest) -> Self {
        Self::from_canonical(&canonical_request(request))
    }

    /// Hash an already canonical value
    pub fn from_canonical(value: &Value) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(value.to_string().as_bytes());
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering, used as the artifact name
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({}…)", &self.to_hex()[..12])
    }
}

/// Canonical form of a request
///
/// Keys are written in sorted order so the rendering is the same whether or
/// not `serde_json` preserves insertion order. Binary payloads are replaced by their digest and MIME type. Characters are
/// a set and are ordered by id; style references keep caller order.
pub fn canonical_request(request: &GenerationRequest) -> Value {
    match request {
        GenerationRequest::Text { prompt } => json!({
            "kind": "text",
            "prompt": prompt,
        }),
        GenerationRequest::ImageFromText {
            prompt,
            characters,
            style_references,
        } => json!({
            "characters": canonical_characters(characters),
            "kind": "image",
            "prompt": prompt,
            "styleReferences": style_references.iter().map(canonical_image).collect::<Vec<_>>(),
        }),
        GenerationRequest::ImageEdit {
            source,
            prompt,
            characters,
        } => json!({
            "characters": canonical_characters(characters),
            "kind": "image_edit",
            "prompt": prompt,
            "source": canonical_image(source),
        }),
    }
}

fn canonical_characters(characters: &[CharacterBlueprint]) -> Vec<Value> {
    let mut sorted: Vec<&CharacterBlueprint> = characters.iter().collect();
    sorted.sort_by(|a, b| {
        (&a.id, &a.name, &a.blueprint).cmp(&(&b.id, &b.name, &b.blueprint))
    });
    sorted
        .into_iter()
        .map(|c| {
            json!({
                "blueprint": c.blueprint,
                "id": c.id,
                "name": c.name,
            })
        })
        .collect()
}

fn canonical_image(image: &ImageInput) -> Value {
    let digest = Sha256::digest(&image.bytes);
    json!({
        "mimeType": image.mime_type,
        "sha256": hex::encode(digest),
    })
}
