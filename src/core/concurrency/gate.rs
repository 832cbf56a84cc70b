//! Bulkhead over remote calls

use crate::utils::error::{GatewayError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

/// Fixed-ceiling gate; waiters are admitted in FIFO order
#[derive(Debug)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    ceiling: usize,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

/// Permission to run one remote call; released on drop
#[derive(Debug)]
#[must_use = "the slot is released as soon as it is dropped"]
pub struct ConcurrencySlot {
    _permit: OwnedSemaphorePermit,
    in_flight: Arc<AtomicUsize>,
}

impl Drop for ConcurrencySlot {
    fn drop(&mut self) {
        let remaining = self.in_flight.fetch_sub(1, Ordering::AcqRel) - 1;
        debug!(in_flight = remaining, "Concurrency slot released");
    }
}

impl ConcurrencyGate {
    /// Create a gate admitting at most `ceiling` concurrent holders
    pub fn new(ceiling: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(ceiling)),
            ceiling,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Wait for a free slot
    pub async fn acquire(&self) -> Result<ConcurrencySlot> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| GatewayError::internal(format!("Concurrency gate closed: {}", e)))?;
        Ok(self.admit(permit))
    }

    /// Take a slot only if one is free right now
    pub fn try_acquire(&self) -> Option<ConcurrencySlot> {
        self.semaphore
            .clone()
            .try_acquire_owned()
            .ok()
            .map(|permit| self.admit(permit))
    }

    fn admit(&self, permit: OwnedSemaphorePermit) -> ConcurrencySlot {
        let now = self.in_flight.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak.fetch_max(now, Ordering::AcqRel);
        debug!(in_flight = now, ceiling = self.ceiling, "Concurrency slot acquired");
        ConcurrencySlot {
            _permit: permit,
            in_flight: self.in_flight.clone(),
        }
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Slots free right now
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Slots held right now
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Highest number of slots ever held at once
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::Acquire)
    }
}
