//! Input policy configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Limits applied to requests before any quota or remote work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputPolicyConfig {
    #[serde(default = "default_min_prompt_length")]
    pub min_prompt_length: usize,
    #[serde(default = "default_max_prompt_length")]
    pub max_prompt_length: usize,
    #[serde(default = "default_max_style_references")]
    pub max_style_references: usize,
    #[serde(default = "default_max_characters")]
    pub max_characters: usize,
    /// Largest accepted source/reference image
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
    /// Case-insensitive terms rejected by the prefilter when bounded by non-word characters
    #[serde(default)]
    pub blocked_terms: Vec<String>,
}

impl Default for InputPolicyConfig {
    fn default() -> Self {
        Self {
            min_prompt_length: default_min_prompt_length(),
            max_prompt_length: default_max_prompt_length(),
            max_style_references: default_max_style_references(),
            max_characters: default_max_characters(),
            max_image_bytes: default_max_image_bytes(),
            blocked_terms: Vec::new(),
        }
    }
}
