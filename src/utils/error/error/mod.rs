//! Error handling for the Gateway
//!
//! This module defines all error types used throughout the gateway.

#![allow(missing_docs)]

mod helpers;
mod kind;
mod response;
mod types;

pub use kind::ErrorKind;
pub use response::{ErrorDetail, ErrorResponse};
pub use types::{GatewayError, Result};
