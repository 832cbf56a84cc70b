//! Error Handling utilities
//!
//! Gateway error taxonomy, machine-readable kinds and serializable responses.

pub mod error;

pub use error::*;
