//! Concurrency admission control
//!
//! Bounds the number of remote calls in flight process-wide.

mod gate;


pub use gate::{ConcurrencyGate, ConcurrencySlot};
