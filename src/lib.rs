//! # StoryWeaver Gateway
//!
//! The single path through which a storytelling app talks to a generative
//! text/image API. Every call is validated, looked up in a content-addressed
//! cache, checked against local usage quotas, admitted through a concurrency
//! ceiling and executed with bounded retries.
//!
//! ## Features
//!
//! - **Quota accounting**: per-minute image units and per-day requests, with
//!   atomic check-and-reserve and optional persistence across restarts
//! - **Content cache**: identical requests are served from stored artifacts
//!   without consuming quota
//! - **Admission control**: a fixed ceiling on simultaneous remote calls
//! - **Resilient execution**: per-attempt deadlines, exponential backoff with
//!   jitter, and classification of rate limits, server errors and fatal
//!   rejections
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use storyweaver_gateway::{Config, GenerationGateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gateway.yaml").await?;
//!     let gateway = GenerationGateway::from_config(&config).await?;
//!
//!     let scene = gateway
//!         .generate_image("A brave knight rides through the misty forest", vec![], vec![])
//!         .await?;
//!     println!("{} bytes at {}", scene.len(), scene.location);
//!
//!     let usage = gateway.get_usage_snapshot();
//!     println!("{} images this minute", usage.images_this_minute());
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::gateway::{GatewayBuilder, GatewayStatsSnapshot, GenerationGateway};
pub use core::types::{
    Artifact, ArtifactLocation, CharacterBlueprint, GenerationRequest, ImageInput, RequestKind,
    UsageSnapshot,
};
pub use utils::error::{ErrorKind, ErrorResponse, GatewayError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
