//! Configuration validation
//!
//! This module provides validation logic for all configuration structures.
//!
//! - `trait_def`: Core Validate trait definition
//! - `gateway_validators`: Validators for every gateway configuration section
//! - `tests`: Test suite for all validators

mod gateway_validators;
mod trait_def;

pub use trait_def::Validate;
