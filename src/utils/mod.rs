//! Utility modules for the generation gateway
//!
//! - **error**: Error types and the crate-wide `Result` alias
//! - **logging**: Subscriber setup and log helpers

pub mod error;
pub mod logging;

pub use error::{ErrorKind, ErrorResponse, GatewayError, Result};
