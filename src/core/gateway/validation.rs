//! Request validation
//!
//! Runs before any side effect: a rejected request never touches the cache,
//! the quota or the remote.

use crate::config::InputPolicyConfig;
use crate::core::types::{GenerationRequest, ImageInput};
use crate::utils::error::{GatewayError, Result};
use regex::Regex;
use std::collections::HashSet;

/// Compiled input policy
#[derive(Debug, Clone)]
pub struct InputPolicy {
    config: InputPolicyConfig,
    blocked: Option<Regex>,
}

impl InputPolicy {
    pub fn new(config: InputPolicyConfig) -> Result<Self> {
        let blocked = if config.blocked_terms.is_empty() {
            None
        } else {
            let alternation = config
                .blocked_terms
                .iter()
                .map(|term| regex::escape(term.trim()))
                .collect::<Vec<_>>()
                .join("|");
            // Terms may start or end with non-word characters
            let pattern = format!(r"(?i)(?:^|\W)(?:{})(?:\W|$)", alternation);
            Some(Regex::new(&pattern).map_err(|e| {
                GatewayError::config(format!("Invalid blocked term pattern: {}", e))
            })?)
        };

        Ok(Self { config, blocked })
    }

    pub fn config(&self) -> &InputPolicyConfig {
        &self.config
    }

    /// Check a request against the policy
    pub fn validate(&self, request: &GenerationRequest) -> Result<()> {
        self.validate_prompt(request.prompt())?;

        let characters = request.characters();
        if characters.len() > self.config.max_characters {
            return Err(GatewayError::validation(format!(
                "Too many characters: {} (max {})",
                characters.len(),
                self.config.max_characters
            )));
        }

        let mut ids = HashSet::new();
        for character in characters {
            if character.id.trim().is_empty() {
                return Err(GatewayError::validation("Character id cannot be empty"));
            }
            if !ids.insert(character.id.as_str()) {
                return Err(GatewayError::validation(format!(
                    "Character selected twice: {}",
                    character.id
                )));
            }
        }

        match request {
            GenerationRequest::Text { .. } => {}
            GenerationRequest::ImageFromText {
                style_references, ..
            } => {
                if style_references.len() > self.config.max_style_references {
                    return Err(GatewayError::validation(format!(
                        "Too many style references: {} (max {})",
                        style_references.len(),
                        self.config.max_style_references
                    )));
                }
                for image in style_references {
                    self.validate_image(image, "Style reference")?;
                }
            }
            GenerationRequest::ImageEdit { source, .. } => {
                self.validate_image(source, "Source image")?;
            }
        }

        Ok(())
    }

    fn validate_prompt(&self, prompt: &str) -> Result<()> {
        let trimmed = prompt.trim();
        if trimmed.is_empty() {
            return Err(GatewayError::validation("Prompt cannot be empty"));
        }

        let length = trimmed.chars().count();
        if length < self.config.min_prompt_length {
            return Err(GatewayError::validation(format!(
                "Prompt is too short: {} characters (min {})",
                length, self.config.min_prompt_length
            )));
        }
        if length > self.config.max_prompt_length {
            return Err(GatewayError::validation(format!(
                "Prompt is too long: {} characters (max {})",
                length, self.config.max_prompt_length
            )));
        }

        if let Some(blocked) = &self.blocked {
            if blocked.is_match(prompt) {
                return Err(GatewayError::validation(
                    "Prompt contains content that is not allowed",
                ));
            }
        }

        Ok(())
    }

    fn validate_image(&self, image: &ImageInput, what: &str) -> Result<()> {
        if image.bytes.is_empty() {
            return Err(GatewayError::validation(format!("{} is empty", what)));
        }
        if !image.mime_type.to_ascii_lowercase().starts_with("image/") {
            return Err(GatewayError::validation(format!(
                "{} has unsupported type: {}",
                what, image.mime_type
            )));
        }
        if image.bytes.len() > self.config.max_image_bytes {
            return Err(GatewayError::validation(format!(
                "{} is too large: {} bytes (max {})",
                what,
                image.bytes.len(),
                self.config.max_image_bytes
            )));
        }
        Ok(())
    }
}
