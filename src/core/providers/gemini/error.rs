//! Gemini error mapping
//!
//! Statuses are passed through unchanged; the executor owns classification.
//! Retry-after hints in error bodies are not extracted.

use super::models::ErrorEnvelope;
use crate::core::providers::remote::RemoteFailure;

/// Longest raw body quoted in an error message
const MAX_BODY_IN_MESSAGE: usize = 256;

/// Finish reasons that mean the remote refused to produce content
const REFUSAL_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "IMAGE_SAFETY",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
    "SPII",
    "RECITATION",
];

pub struct GeminiErrorMapper;

impl GeminiErrorMapper {
    /// Map a non-success response
    pub fn from_http_status(status: u16, body: &str) -> RemoteFailure {
        RemoteFailure::status(status, Self::extract_message(body))
    }

    /// Map a request that never produced a response
    pub fn from_transport(error: &reqwest::Error) -> RemoteFailure {
        if error.is_timeout() {
            RemoteFailure::timeout(format!("Request timed out: {}", error))
        } else if error.is_connect() {
            RemoteFailure::transport(format!("Connection failed: {}", error))
        } else {
            RemoteFailure::transport(format!("Network error: {}", error))
        }
    }

    /// The remote refused the prompt before generating
    pub fn blocked_prompt(reason: &str) -> RemoteFailure {
        RemoteFailure::status(400, format!("Prompt blocked: {}", reason))
    }

    /// Refusal signalled through a candidate's finish reason, if any
    pub fn refusal(finish_reason: &str) -> Option<RemoteFailure> {
        REFUSAL_FINISH_REASONS
            .contains(&finish_reason)
            .then(|| RemoteFailure::status(400, format!("Generation refused: {}", finish_reason)))
    }

    /// `error.message` (with `error.status`) when present, else a trimmed raw body
    pub fn extract_message(body: &str) -> String {
        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
            let message = envelope.error.message.unwrap_or_default();
            return match envelope.error.status {
                Some(status) if !status.is_empty() => format!("{}: {}", status, message),
                _ => message,
            };
        }

        let trimmed = body.trim();
        if trimmed.chars().count() > MAX_BODY_IN_MESSAGE {
            let head: String = trimmed.chars().take(MAX_BODY_IN_MESSAGE).collect();
            format!("{}…", head)
        } else {
            trimmed.to_string()
        }
    }
}
