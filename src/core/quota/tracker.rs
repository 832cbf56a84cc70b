//! Quota tracker

use super::clock::{Clock, SystemClock};
use super::types::{PersistedUsage, QuotaWindow, Reservation};
use super::window::TimeWindow;
use crate::config::QuotaConfig;
use crate::core::types::{RequestKind, UsageSnapshot};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Length of the image unit window
pub const UNIT_WINDOW_MS: u64 = 60 * 1000;

/// Length of the request window
pub const REQUEST_WINDOW_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Debug)]
struct QuotaState {
    units: TimeWindow,
    requests: TimeWindow,
}

/// Tracks per-minute image units and per-day requests
///
/// The lock is held only for arithmetic; nothing awaits while holding it.
#[derive(Debug)]
pub struct QuotaTracker {
    clock: Arc<dyn Clock>,
    state: Mutex<QuotaState>,
    image_unit_cost: u32,
}

impl QuotaTracker {
    /// Create a tracker driven by the system clock
    pub fn new(config: &QuotaConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a tracker driven by the given clock
    pub fn with_clock(config: &QuotaConfig, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now_ms();
        Self {
            state: Mutex::new(QuotaState {
                units: TimeWindow::new(now, UNIT_WINDOW_MS, config.image_units_per_minute),
                requests: TimeWindow::new(now, REQUEST_WINDOW_MS, config.requests_per_day),
            }),
            clock,
            image_unit_cost: config.image_unit_cost,
        }
    }

    /// Units an image request draws under the current configuration
    pub fn image_unit_cost(&self) -> u32 {
        self.image_unit_cost
    }

    /// Reserve capacity for one request of `kind` at its configured cost
    pub fn reserve(&self, kind: RequestKind) -> Reservation {
        let units = match kind {
            RequestKind::Text => 0,
            RequestKind::Image => self.image_unit_cost,
        };
        self.check_and_reserve(kind, units)
    }

    /// Atomically check both windows and count the request if it fits
    ///
    /// `units` is drawn from the per-minute window for image requests and
    /// ignored for text. Every request draws one from the per-day window.
    pub fn check_and_reserve(&self, kind: RequestKind, units: u32) -> Reservation {
        let units = match kind {
            RequestKind::Text => 0,
            RequestKind::Image => units,
        };

        let now = self.clock.now_ms();
        let mut state = self.state.lock();

        state.units.roll_over(now);
        state.requests.roll_over(now);

        let exhausted = if kind == RequestKind::Image && state.units.would_exceed(units) {
            Some(QuotaWindow::Units)
        } else if state.requests.would_exceed(1) {
            Some(QuotaWindow::Requests)
        } else {
            None
        };

        if exhausted.is_none() {
            state.units.consume(units);
            state.requests.consume(1);
        }

        let snapshot = Self::snapshot_of(&state, now);
        let reservation = Reservation {
            allowed: exhausted.is_none(),
            snapshot,
            exhausted,
            kind,
            units,
            unit_window_start: state.units.start_ms(),
            request_window_start: state.requests.start_ms(),
        };
        drop(state);

        match exhausted {
            None => debug!(
                kind = %kind,
                units,
                units_used = snapshot.units_used_in_window,
                requests_used = snapshot.requests_used_in_window,
                "Quota reserved"
            ),
            Some(window) => warn!(
                kind = %kind,
                ?window,
                units_reset_in_seconds = snapshot.units_reset_in_seconds,
                requests_reset_in_seconds = snapshot.requests_reset_in_seconds,
                "Quota exhausted"
            ),
        }

        reservation
    }

    /// Give back an admitted reservation
    ///
    /// Only windows that are still the ones that accepted the reservation are
    /// decremented; a window that rolled over meanwhile is left alone.
    pub fn refund(&self, reservation: &Reservation) {
        if !reservation.allowed {
            return;
        }

        let now = self.clock.now_ms();
        let mut state = self.state.lock();

        if state.units.start_ms() == reservation.unit_window_start && state.units.is_current(now) {
            state.units.release(reservation.units);
        }
        if state.requests.start_ms() == reservation.request_window_start
            && state.requests.is_current(now)
        {
            state.requests.release(1);
        }

        debug!(kind = %reservation.kind, units = reservation.units, "Quota refunded");
    }

    /// Current usage; never mutates the windows
    pub fn snapshot(&self) -> UsageSnapshot {
        let now = self.clock.now_ms();
        let state = self.state.lock();
        Self::snapshot_of(&state, now)
    }

    fn snapshot_of(state: &QuotaState, now: u64) -> UsageSnapshot {
        let (units_used, units_reset) = state.units.observe(now);
        let (requests_used, requests_reset) = state.requests.observe(now);
        UsageSnapshot {
            units_used_in_window: units_used,
            unit_limit: state.units.limit(),
            units_reset_in_seconds: units_reset,
            requests_used_in_window: requests_used,
            request_limit: state.requests.limit(),
            requests_reset_in_seconds: requests_reset,
        }
    }

    /// Windows in their durable form
    pub fn export_state(&self) -> PersistedUsage {
        let state = self.state.lock();
        PersistedUsage {
            units: state.units.state(),
            requests: state.requests.state(),
        }
    }

    /// Replace both windows with previously persisted state
    pub fn restore(&self, persisted: PersistedUsage) {
        let now = self.clock.now_ms();
        let mut state = self.state.lock();
        state.units.restore(persisted.units, now);
        state.requests.restore(persisted.requests, now);
        debug!(
            units = state.units.state().count,
            requests = state.requests.state().count,
            "Quota state restored"
        );
    }
}
