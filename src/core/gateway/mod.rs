//! Generation request gateway
//!
//! Orchestrates one generation call: validate, consult the content cache,
//! reserve quota, wait for a concurrency slot, run the remote call through
//! the resilient executor and cache the result.

mod builder;
mod gateway;
mod stats;
mod validation;


pub use builder::GatewayBuilder;
pub use gateway::GenerationGateway;
pub use stats::{CallPhase, GatewayStats, GatewayStatsSnapshot};
pub use validation::InputPolicy;
