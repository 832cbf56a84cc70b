//! Fixed-duration counting window

use super::types::WindowState;

#[derive(Debug, Clone)]
pub(super) struct TimeWindow {
    start_ms: u64,
    duration_ms: u64,
    count: u32,
    limit: u32,
}

impl TimeWindow {
    pub(super) fn new(now_ms: u64, duration_ms: u64, limit: u32) -> Self {
        Self {
            start_ms: now_ms,
            duration_ms,
            count: 0,
            limit,
        }
    }

    pub(super) fn limit(&self) -> u32 {
        self.limit
    }

    pub(super) fn start_ms(&self) -> u64 {
        self.start_ms
    }

    fn elapsed(&self, now_ms: u64) -> u64 {
        // A clock that stepped backwards reads as zero elapsed
        now_ms.saturating_sub(self.start_ms)
    }

    pub(super) fn is_current(&self, now_ms: u64) -> bool {
        self.elapsed(now_ms) < self.duration_ms
    }

    /// Start a fresh window at `now` if this one has expired
    pub(super) fn roll_over(&mut self, now_ms: u64) {
        if !self.is_current(now_ms) {
            self.start_ms = now_ms;
            self.count = 0;
        }
    }

    pub(super) fn would_exceed(&self, cost: u32) -> bool {
        u64::from(self.count) + u64::from(cost) > u64::from(self.limit)
    }

    pub(super) fn consume(&mut self, cost: u32) {
        self.count = self.count.saturating_add(cost);
    }

    pub(super) fn release(&mut self, cost: u32) {
        self.count = self.count.saturating_sub(cost);
    }

    /// Count and whole seconds to reset as seen at `now`, without rolling over
    pub(super) fn observe(&self, now_ms: u64) -> (u32, u64) {
        if self.is_current(now_ms) {
            let remaining = self.duration_ms - self.elapsed(now_ms);
            (self.count, remaining.div_ceil(1000))
        } else {
            (0, self.duration_ms.div_ceil(1000))
        }
    }

    pub(super) fn state(&self) -> WindowState {
        WindowState {
            start_ms: self.start_ms,
            count: self.count,
        }
    }

    /// Adopt persisted state; a start in the future is clamped to `now`
    pub(super) fn restore(&mut self, state: WindowState, now_ms: u64) {
        self.start_ms = state.start_ms.min(now_ms);
        self.count = state.count;
        self.roll_over(now_ms);
    }
}
