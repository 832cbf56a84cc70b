//! Remote generation boundary
//!
//! Everything the gateway knows about the generative API goes through
//! [`RemoteGenerator`]. Implementations report failures as [`RemoteFailure`]
//! values; classification into retryable and fatal happens in the executor.

use crate::core::types::{CharacterBlueprint, GenerationRequest, ImageInput};
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use thiserror::Error;

/// One part of a remote call
#[derive(Clone, PartialEq, Eq)]
pub enum RemotePart {
    Text(String),
    InlineData { mime_type: String, data: Bytes },
}

impl fmt::Debug for RemotePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            Self::InlineData { mime_type, data } => f
                .debug_struct("InlineData")
                .field("mime_type", mime_type)
                .field("len", &data.len())
                .finish(),
        }
    }
}

impl From<&ImageInput> for RemotePart {
    fn from(image: &ImageInput) -> Self {
        Self::InlineData {
            mime_type: image.mime_type.clone(),
            data: image.bytes.clone(),
        }
    }
}

/// What the remote should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseModality {
    Text,
    Image,
}

/// A fully assembled remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCall {
    pub parts: Vec<RemotePart>,
    pub modality: ResponseModality,
}

impl RemoteCall {
    /// Assemble the remote call for a gateway request
    ///
    /// Image inputs come first, then the prompt, then one text part per
    /// character blueprint.
    pub fn from_request(request: &GenerationRequest) -> Self {
        let modality = match request {
            GenerationRequest::Text { .. } => ResponseModality::Text,
            _ => ResponseModality::Image,
        };

        let mut parts: Vec<RemotePart> = request.images().into_iter().map(RemotePart::from).collect();
        parts.push(RemotePart::Text(request.prompt().to_string()));
        parts.extend(request.characters().iter().map(character_part));

        Self { parts, modality }
    }

    pub fn text_parts(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|part| match part {
            RemotePart::Text(text) => Some(text.as_str()),
            RemotePart::InlineData { .. } => None,
        })
    }

    pub fn inline_parts(&self) -> usize {
        self.parts
            .iter()
            .filter(|part| matches!(part, RemotePart::InlineData { .. }))
            .count()
    }
}

fn character_part(character: &CharacterBlueprint) -> RemotePart {
    RemotePart::Text(format!("Character {}: {}", character.name, character.blueprint))
}

/// Successful remote result
#[derive(Clone, PartialEq, Eq)]
pub struct RemotePayload {
    pub bytes: Bytes,
    pub mime_type: String,
}

impl RemotePayload {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            bytes: Bytes::from(text.into()),
            mime_type: "text/plain".to_string(),
        }
    }

    pub fn image(bytes: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }
}

impl fmt::Debug for RemotePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemotePayload")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Raw failure of a single remote attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteFailure {
    /// The remote answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// No response was received
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request went out but no response arrived in time
    #[error("Timed out: {0}")]
    Timeout(String),

    /// A response was received but did not contain the expected artifact
    #[error("Malformed response: {0}")]
    Protocol(String),
}

impl RemoteFailure {
    pub fn status<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport(message.into())
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    pub fn protocol<S: Into<String>>(message: S) -> Self {
        Self::Protocol(message.into())
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Status { message, .. }
            | Self::Transport(message)
            | Self::Timeout(message)
            | Self::Protocol(message) => {
                message
            }
        }
    }
}

/// A generative backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteGenerator: Send + Sync {
    /// Run one attempt of a remote call
    async fn generate(&self, call: &RemoteCall) -> Result<RemotePayload, RemoteFailure>;
}
