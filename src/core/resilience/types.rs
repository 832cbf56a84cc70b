//! Execution outcome types

use crate::core::providers::RemotePayload;
use crate::utils::error::GatewayError;

/// Why a failed attempt may be retried
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryClass {
    RateLimited { status: Option<u16>, message: String },
    ServerError { status: u16, message: String },
    Timeout { message: String },
}

/// Why a failed attempt must not be retried
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FatalReason {
    /// Rejected by the remote, or never reached it
    ClientError { status: Option<u16>, message: String },
    /// Answered without the expected artifact
    Protocol(String),
}

/// Terminal result of an execution; never a raw transport error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    Success(RemotePayload),
    /// Last classification after the attempt budget was spent
    RetryableFailure(RetryClass),
    FatalFailure(FatalReason),
}

/// Outcome plus the number of attempts it took
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub outcome: RemoteOutcome,
    pub attempts: u32,
}

impl Execution {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RemoteOutcome::Success(_))
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self.outcome, RemoteOutcome::FatalFailure(_))
    }

    /// Translate into the caller-facing error taxonomy
    pub fn into_result(self) -> Result<RemotePayload, GatewayError> {
        let attempts = self.attempts;
        match self.outcome {
            RemoteOutcome::Success(payload) => Ok(payload),
            RemoteOutcome::RetryableFailure(RetryClass::RateLimited { message, .. }) => {
                Err(GatewayError::RemoteRateLimited { attempts, message })
            }
            RemoteOutcome::RetryableFailure(RetryClass::ServerError { status, message }) => {
                Err(GatewayError::RemoteServerError {
                    status: Some(status),
                    attempts,
                    message,
                })
            }
            RemoteOutcome::RetryableFailure(RetryClass::Timeout { message }) => {
                Err(GatewayError::Timeout { attempts, message })
            }
            RemoteOutcome::FatalFailure(FatalReason::ClientError { status, message }) => {
                Err(GatewayError::RemoteClientError { status, message })
            }
            RemoteOutcome::FatalFailure(FatalReason::Protocol(message)) => {
                Err(GatewayError::RemoteProtocolError(message))
            }
        }
    }
}
