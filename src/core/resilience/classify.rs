//! Failure classification
//!
//! The status code decides first; wording only upgrades a non-5xx failure to
//! rate limited. Provider retry-after hints are ignored.

use super::types::{FatalReason, RetryClass};
use crate::core::providers::RemoteFailure;

/// Phrases providers use for throttling
const RATE_LIMIT_MARKERS: &[&str] = &[
    "rate limit",
    "rate_limit",
    "ratelimit",
    "quota",
    "resource_exhausted",
    "resource exhausted",
    "too many requests",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Retryable(RetryClass),
    Fatal(FatalReason),
}

impl Classification {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable(_))
    }
}

fn mentions_rate_limit(message: &str) -> bool {
    let lower = message.to_lowercase();
    RATE_LIMIT_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Classify one failed attempt
pub fn classify(failure: RemoteFailure) -> Classification {
    match failure {
        RemoteFailure::Status { status: 429, message } => {
            Classification::Retryable(RetryClass::RateLimited {
                status: Some(429),
                message,
            })
        }
        RemoteFailure::Status { status, message } if (500..=599).contains(&status) => {
            Classification::Retryable(RetryClass::ServerError { status, message })
        }
        RemoteFailure::Status { status, message } if mentions_rate_limit(&message) => {
            Classification::Retryable(RetryClass::RateLimited {
                status: Some(status),
                message,
            })
        }
        RemoteFailure::Status { status, message } => {
            Classification::Fatal(FatalReason::ClientError {
                status: Some(status),
                message,
            })
        }
        RemoteFailure::Transport(message) if mentions_rate_limit(&message) => {
            Classification::Retryable(RetryClass::RateLimited {
                status: None,
                message,
            })
        }
        RemoteFailure::Transport(message) => Classification::Fatal(FatalReason::ClientError {
            status: None,
            message,
        }),
        RemoteFailure::Timeout(message) => {
            Classification::Retryable(RetryClass::Timeout { message })
        }
        RemoteFailure::Protocol(message) => Classification::Fatal(FatalReason::Protocol(message)),
    }
}
