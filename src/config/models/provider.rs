//! Remote provider configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gemini generative API settings
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key; usually supplied through `GEMINI_API_KEY`
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model used for text generation
    #[serde(default = "default_text_model")]
    pub text_model: String,
    /// Model used for image generation and editing
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// TCP connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}
