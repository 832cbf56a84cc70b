//! Machine-readable error kinds

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error kind exposed to callers that must not depend on provider details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    #[serde(rename = "VALIDATION_ERROR")]
    Validation,
    QuotaExceeded,
    RemoteRateLimited,
    RemoteServerError,
    RemoteClientError,
    RemoteProtocolError,
    Timeout,
    #[serde(rename = "CONFIG_ERROR")]
    Config,
    #[serde(rename = "STORAGE_ERROR")]
    Storage,
    #[serde(rename = "INTERNAL_ERROR")]
    Internal,
}

impl ErrorKind {
    /// "Try again shortly" family
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            Self::QuotaExceeded | Self::RemoteRateLimited | Self::RemoteServerError | Self::Timeout
        )
    }

    /// "Rejected, change your input" family
    pub fn is_rejection(self) -> bool {
        matches!(
            self,
            Self::Validation | Self::RemoteClientError | Self::RemoteProtocolError
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::QuotaExceeded => "QUOTA_EXCEEDED",
            Self::RemoteRateLimited => "REMOTE_RATE_LIMITED",
            Self::RemoteServerError => "REMOTE_SERVER_ERROR",
            Self::RemoteClientError => "REMOTE_CLIENT_ERROR",
            Self::RemoteProtocolError => "REMOTE_PROTOCOL_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Config => "CONFIG_ERROR",
            Self::Storage => "STORAGE_ERROR",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
