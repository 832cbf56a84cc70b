//! Configuration data models
//!
//! This module defines all configuration structures used by the gateway.

#![allow(missing_docs)]

pub mod cache;
pub mod concurrency;
pub mod gateway;
pub mod input;
pub mod logging;
pub mod provider;
pub mod quota;
pub mod retry;

// Re-export all configuration types
pub use cache::*;
pub use concurrency::*;
pub use gateway::*;
pub use input::*;
pub use logging::*;
pub use provider::*;
pub use quota::*;
pub use retry::*;

pub fn default_true() -> bool {
    true
}

/// Image units admitted per minute
pub fn default_units_per_minute() -> u32 {
    20
}

/// Requests admitted per day
pub fn default_requests_per_day() -> u32 {
    1000
}

pub fn default_image_unit_cost() -> u32 {
    1
}

pub fn default_max_in_flight() -> usize {
    2
}

pub fn default_timeout_ms() -> u64 {
    45_000
}

/// Total attempts, first call included
pub fn default_max_attempts() -> u32 {
    3
}

pub fn default_base_delay_ms() -> u64 {
    750
}

pub fn default_max_delay_ms() -> u64 {
    10_000
}

pub fn default_jitter_ms() -> u64 {
    250
}

pub fn default_hot_capacity_bytes() -> u64 {
    64 * 1024 * 1024 // 64MB
}

pub fn default_artifact_path() -> String {
    "./data/artifacts".to_string()
}

pub fn default_min_prompt_length() -> usize {
    3
}

pub fn default_max_prompt_length() -> usize {
    8_000
}

pub fn default_max_style_references() -> usize {
    4
}

pub fn default_max_characters() -> usize {
    8
}

pub fn default_max_image_bytes() -> usize {
    20 * 1024 * 1024 // 20MB
}

pub fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

pub fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

pub fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

pub fn default_connect_timeout() -> u64 {
    10
}

pub fn default_log_level() -> String {
    "info".to_string()
}
