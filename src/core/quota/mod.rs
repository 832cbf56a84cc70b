//! Local usage quota
//!
//! Two fixed windows guard the remote API: a per-minute window counting image
//! units and a per-day window counting requests of any kind. Admission is a
//! single check-and-reserve under one lock so concurrent callers can never
//! overshoot a limit.

mod clock;
mod tracker;
mod types;
mod window;


pub use clock::{Clock, ManualClock, SystemClock};
pub use tracker::{QuotaTracker, REQUEST_WINDOW_MS, UNIT_WINDOW_MS};
pub use types::{PersistedUsage, QuotaWindow, Reservation, WindowState};
