//! Platform abstraction layer
//!
//! The simulation never reads the wall clock itself; the host passes the
//! current time in, taken from one of these sources.

pub mod time;

pub use time::{Clock, ManualClock, SystemClock};
