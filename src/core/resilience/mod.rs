//! Resilient remote execution
//!
//! Every attempt runs under a deadline. Failures are classified as retryable
//! (rate limited, server error, timeout) or fatal; retryable ones are retried
//! with capped exponential backoff plus jitter until the attempt budget runs out.

mod classify;
mod executor;
mod types;


pub use classify::{Classification, classify};
pub use executor::ResilientExecutor;
pub use types::{Execution, FatalReason, RemoteOutcome, RetryClass};
