//! Timeout and retry around a remote operation

use super::classify::{Classification, classify};
use super::types::{Execution, RemoteOutcome, RetryClass};
use crate::config::RetryConfig;
use crate::core::providers::{RemoteFailure, RemotePayload};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Runs a remote operation with a per-attempt deadline and backoff
#[derive(Debug, Clone)]
pub struct ResilientExecutor {
    config: RetryConfig,
}

impl ResilientExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Delay before retry `retry_index` (0-based) without jitter
    ///
    /// `min(max_delay, base_delay * 2^retry_index)`
    pub fn base_backoff(&self, retry_index: u32) -> Duration {
        let factor = 1u64.checked_shl(retry_index).unwrap_or(u64::MAX);
        let delay = self
            .config
            .base_delay_ms
            .saturating_mul(factor)
            .min(self.config.max_delay_ms);
        Duration::from_millis(delay)
    }

    /// Delay before retry `retry_index` including uniform jitter
    pub fn backoff(&self, retry_index: u32) -> Duration {
        let jitter = if self.config.jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=self.config.jitter_ms)
        };
        self.base_backoff(retry_index) + Duration::from_millis(jitter)
    }

    /// Run `op` until it succeeds, fails fatally, or the attempt budget is spent
    ///
    /// An attempt that misses its deadline is dropped, which cancels its
    /// in-flight work, and counts as a retryable timeout.
    pub async fn execute<F, Fut>(&self, mut op: F) -> Execution
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<RemotePayload, RemoteFailure>>,
    {
        let deadline = self.config.timeout();
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let classification = match tokio::time::timeout(deadline, op()).await {
                Ok(Ok(payload)) => {
                    if attempt > 1 {
                        debug!("Remote call succeeded on attempt {}", attempt);
                    }
                    return Execution {
                        outcome: RemoteOutcome::Success(payload),
                        attempts: attempt,
                    };
                }
                Ok(Err(failure)) => classify(failure),
                Err(_) => Classification::Retryable(RetryClass::Timeout {
                    message: format!("no response within {}ms", deadline.as_millis()),
                }),
            };

            match classification {
                Classification::Fatal(reason) => {
                    warn!(attempt, ?reason, "Remote call failed fatally");
                    return Execution {
                        outcome: RemoteOutcome::FatalFailure(reason),
                        attempts: attempt,
                    };
                }
                Classification::Retryable(class) => {
                    if attempt >= max_attempts {
                        warn!(attempt, ?class, "Remote call failed after exhausting retries");
                        return Execution {
                            outcome: RemoteOutcome::RetryableFailure(class),
                            attempts: attempt,
                        };
                    }

                    let delay = self.backoff(attempt - 1);
                    debug!(
                        attempt,
                        ?class,
                        delay_ms = delay.as_millis() as u64,
                        "Remote call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
