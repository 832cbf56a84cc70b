//! Core functionality for the Gateway
//!
//! Quota accounting, content caching, admission control, resilient remote
//! execution and the gateway that ties them together.

pub mod cache;
pub mod concurrency;
pub mod gateway;
pub mod providers;
pub mod quota;
pub mod resilience;
pub mod types;

pub use gateway::{GatewayBuilder, GenerationGateway};
