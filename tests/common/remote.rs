//! Scripted remote generator
//!
//! Replays a queue of outcomes, then falls back to a default. Records how
//! many calls were made and how many ran at once.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use storyweaver_gateway::core::providers::{
    RemoteCall, RemoteFailure, RemoteGenerator, RemotePayload,
};
use tokio::sync::Semaphore;

type Outcome = Result<RemotePayload, RemoteFailure>;

#[derive(Debug)]
struct Inner {
    script: Mutex<VecDeque<Outcome>>,
    fallback: Outcome,
    delay: Option<Duration>,
    hold: Option<Arc<Semaphore>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    completed: AtomicUsize,
    seen: Mutex<Vec<RemoteCall>>,
}

/// Cloneable handle; clones share counters
#[derive(Debug, Clone)]
pub struct ScriptedRemote {
    inner: Arc<Inner>,
}

impl ScriptedRemote {
    fn with(script: Vec<Outcome>, fallback: Outcome) -> Self {
        Self {
            inner: Arc::new(Inner {
                script: Mutex::new(script.into()),
                fallback,
                delay: None,
                hold: None,
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                completed: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Every call returns `payload`
    pub fn always(payload: RemotePayload) -> Self {
        Self::with(Vec::new(), Ok(payload))
    }

    /// Every call fails with `failure`
    pub fn failing(failure: RemoteFailure) -> Self {
        Self::with(Vec::new(), Err(failure))
    }

    /// Replay `script`, then return `payload`
    pub fn scripted(script: Vec<Outcome>, payload: RemotePayload) -> Self {
        Self::with(script, Ok(payload))
    }

    /// Sleep this long inside every call
    pub fn with_delay(self, delay: Duration) -> Self {
        self.rebuild(|inner| inner.delay = Some(delay))
    }

    /// Block every call until a permit is added to `hold`
    pub fn held_by(self, hold: Arc<Semaphore>) -> Self {
        self.rebuild(|inner| inner.hold = Some(hold))
    }

    fn rebuild(self, edit: impl FnOnce(&mut Inner)) -> Self {
        let mut inner = Arc::try_unwrap(self.inner).expect("configure before sharing");
        edit(&mut inner);
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.inner.completed.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.inner.peak.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<RemoteCall> {
        self.inner.seen.lock().clone()
    }
}

#[async_trait]
impl RemoteGenerator for ScriptedRemote {
    async fn generate(&self, call: &RemoteCall) -> Result<RemotePayload, RemoteFailure> {
        let inner = &self.inner;
        inner.calls.fetch_add(1, Ordering::SeqCst);
        inner.seen.lock().push(call.clone());

        let now = inner.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        inner.peak.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlightGuard(&inner.in_flight);

        if let Some(hold) = &inner.hold {
            if let Ok(permit) = hold.acquire().await {
                permit.forget();
            }
        }
        if let Some(delay) = inner.delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = inner
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| inner.fallback.clone());

        inner.completed.fetch_add(1, Ordering::SeqCst);
        outcome
    }
}

/// Decrements the in-flight count even when the call is dropped mid-way
struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
