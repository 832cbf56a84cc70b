//! Helper functions for creating and inspecting errors

use super::kind::ErrorKind;
use super::types::GatewayError;
use crate::core::quota::QuotaWindow;
use crate::core::types::UsageSnapshot;

/// Helper functions for creating specific errors
impl GatewayError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn quota_exceeded<S: Into<String>>(
        message: S,
        window: QuotaWindow,
        snapshot: UsageSnapshot,
    ) -> Self {
        Self::QuotaExceeded {
            message: message.into(),
            window,
            snapshot,
        }
    }

    pub fn protocol<S: Into<String>>(message: S) -> Self {
        Self::RemoteProtocolError(message.into())
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }
}

impl GatewayError {
    /// Machine-readable kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::QuotaExceeded { .. } => ErrorKind::QuotaExceeded,
            Self::RemoteRateLimited { .. } => ErrorKind::RemoteRateLimited,
            Self::RemoteServerError { .. } => ErrorKind::RemoteServerError,
            Self::RemoteClientError { .. } => ErrorKind::RemoteClientError,
            Self::RemoteProtocolError(_) => ErrorKind::RemoteProtocolError,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Config(_) | Self::Yaml(_) => ErrorKind::Config,
            Self::Storage(_) | Self::Io(_) => ErrorKind::Storage,
            Self::HttpClient(_) | Self::Serialization(_) | Self::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Whether the caller should simply try again shortly.
    ///
    /// True for local quota rejections and remote failures that were retryable
    /// but exhausted the retry budget.
    pub fn is_retryable(&self) -> bool {
        self.kind().is_transient()
    }

    /// Quota snapshot attached to a `QuotaExceeded` error
    pub fn snapshot(&self) -> Option<&UsageSnapshot> {
        match self {
            Self::QuotaExceeded { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }

    /// Window that refused a `QuotaExceeded` error
    pub fn exhausted_window(&self) -> Option<QuotaWindow> {
        match self {
            Self::QuotaExceeded { window, .. } => Some(*window),
            _ => None,
        }
    }

    /// Message safe to show to an end user; never contains provider status codes
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::QuotaExceeded {
                window, snapshot, ..
            } => match window {
                QuotaWindow::Units => format!(
                    "Image limit reached. Try again in {}s.",
                    snapshot.units_reset_in_seconds
                ),
                QuotaWindow::Requests => format!(
                    "Daily request limit reached. Try again in {}s.",
                    snapshot.requests_reset_in_seconds
                ),
            },
            Self::RemoteRateLimited { .. } | Self::RemoteServerError { .. } | Self::Timeout { .. } => {
                "The generation service is busy. Please try again shortly.".to_string()
            }
            Self::RemoteClientError { .. } | Self::RemoteProtocolError(_) => {
                "The request was rejected. Please change your input and try again.".to_string()
            }
            _ => "An internal error occurred".to_string(),
        }
    }
}
