//! Error types for the Gateway

use crate::core::quota::QuotaWindow;
use crate::core::types::UsageSnapshot;
use thiserror::Error;

/// Result type alias for the Gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the Gateway
///
/// The first seven variants are the caller-facing taxonomy of a generation call.
/// The rest are ambient failures (configuration, storage, serialization).
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Bad input; never retried, never consumes quota
    #[error("Validation error: {0}")]
    Validation(String),

    /// Local quota policy rejected the request before any remote work
    #[error("Quota exceeded: {message}")]
    QuotaExceeded {
        message: String,
        /// Window that refused the request
        window: QuotaWindow,
        snapshot: UsageSnapshot,
    },

    /// Remote kept rate limiting us until retries ran out
    #[error("Remote rate limited after {attempts} attempt(s): {message}")]
    RemoteRateLimited { attempts: u32, message: String },

    /// Remote kept failing with 5xx until retries ran out
    #[error("Remote server error after {attempts} attempt(s): {message}")]
    RemoteServerError {
        status: Option<u16>,
        attempts: u32,
        message: String,
    },

    /// Remote rejected the request (4xx other than 429, policy rejection, transport failure)
    #[error("Remote rejected the request: {message}")]
    RemoteClientError { status: Option<u16>, message: String },

    /// Remote answered without the expected artifact
    #[error("Remote protocol error: {0}")]
    RemoteProtocolError(String),

    /// Every attempt hit the per-attempt deadline
    #[error("Timed out after {attempts} attempt(s): {message}")]
    Timeout { attempts: u32, message: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Artifact or usage storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
