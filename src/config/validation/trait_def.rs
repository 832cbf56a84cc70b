//! Validation trait definition
//!
//! This module defines the core Validate trait used by all configuration structures.

/// Validation trait for configuration structures
///
/// Errors are plain messages; `Config::validate` wraps them in `GatewayError::Config`.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
