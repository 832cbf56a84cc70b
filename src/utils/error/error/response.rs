//! Serializable error responses for the application layer

use super::kind::ErrorKind;
use super::types::GatewayError;
use crate::core::types::UsageSnapshot;
use serde::Serialize;

/// Standard error response format
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: ErrorKind,
    pub message: String,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageSnapshot>,
    pub timestamp: i64,
}

impl From<&GatewayError> for ErrorResponse {
    fn from(error: &GatewayError) -> Self {
        Self {
            error: ErrorDetail {
                code: error.kind(),
                message: error.user_message(),
                retryable: error.is_retryable(),
                usage: error.snapshot().cloned(),
                timestamp: chrono::Utc::now().timestamp(),
            },
        }
    }
}
