//! Generation request variants
//!
//! Each variant carries exactly what the remote API needs for one call.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Image payload supplied by the caller (style reference or edit source)
#[derive(Clone, PartialEq, Eq)]
pub struct ImageInput {
    /// Raw image bytes
    pub bytes: Bytes,
    /// MIME type, e.g. `image/png`
    pub mime_type: String,
}

impl ImageInput {
    pub fn new(bytes: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }
}

impl fmt::Debug for ImageInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageInput")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A story character selected for an image, with its visual blueprint text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterBlueprint {
    /// Stable character identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Visual description used to keep the character consistent across images
    pub blueprint: String,
}

impl CharacterBlueprint {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        blueprint: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            blueprint: blueprint.into(),
        }
    }
}

/// What kind of budget a request draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Consumes only the daily request window
    Text,
    /// Consumes the per-minute unit window and the daily request window
    Image,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Image => f.write_str("image"),
        }
    }
}

/// One gateway call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    Text {
        prompt: String,
    },
    ImageFromText {
        prompt: String,
        characters: Vec<CharacterBlueprint>,
        style_references: Vec<ImageInput>,
    },
    ImageEdit {
        source: ImageInput,
        prompt: String,
        characters: Vec<CharacterBlueprint>,
    },
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self::Text {
            prompt: prompt.into(),
        }
    }

    pub fn image(
        prompt: impl Into<String>,
        characters: Vec<CharacterBlueprint>,
        style_references: Vec<ImageInput>,
    ) -> Self {
        Self::ImageFromText {
            prompt: prompt.into(),
            characters,
            style_references,
        }
    }

    pub fn edit(
        source: ImageInput,
        prompt: impl Into<String>,
        characters: Vec<CharacterBlueprint>,
    ) -> Self {
        Self::ImageEdit {
            source,
            prompt: prompt.into(),
            characters,
        }
    }

    pub fn kind(&self) -> RequestKind {
        match self {
            Self::Text { .. } => RequestKind::Text,
            Self::ImageFromText { .. } | Self::ImageEdit { .. } => RequestKind::Image,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            Self::Text { prompt }
            | Self::ImageFromText { prompt, .. }
            | Self::ImageEdit { prompt, .. } => prompt,
        }
    }

    pub fn characters(&self) -> &[CharacterBlueprint] {
        match self {
            Self::Text { .. } => &[],
            Self::ImageFromText { characters, .. } | Self::ImageEdit { characters, .. } => {
                characters
            }
        }
    }

    /// All images attached to the request, source image first
    pub fn images(&self) -> Vec<&ImageInput> {
        match self {
            Self::Text { .. } => Vec::new(),
            Self::ImageFromText {
                style_references, ..
            } => style_references.iter().collect(),
            Self::ImageEdit { source, .. } => vec![source],
        }
    }

    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::ImageFromText { .. } => "image",
            Self::ImageEdit { .. } => "image_edit",
        }
    }
}
