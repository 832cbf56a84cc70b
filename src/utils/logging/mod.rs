//! Logging utilities
//!
//! Subscriber setup for the binary and small helpers for keeping request
//! payloads out of log lines.

use crate::config::{LogFormat, LoggingConfig};
use crate::utils::error::{GatewayError, Result};
use tracing_subscriber::EnvFilter;

/// Longest prompt fragment written to logs
pub const PROMPT_PREVIEW_CHARS: usize = 48;

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| GatewayError::config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    let installed = match config.format {
        LogFormat::Text => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| GatewayError::internal(format!("Failed to install logger: {}", e)))
}

/// Shorten a prompt for log output, respecting char boundaries
pub fn prompt_preview(prompt: &str) -> String {
    let mut chars = prompt.chars();
    let preview: String = chars.by_ref().take(PROMPT_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", preview)
    } else {
        preview
    }
}
