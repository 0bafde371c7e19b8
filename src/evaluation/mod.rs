//! Route invariant verification.
//!
//! Re-derives timing and passenger counts from scratch as a correctness
//! gate over committed schedules. Violations signal defects in the
//! insertion engine, not unserviceable requests.

mod checker;

pub use checker::{check_fleet, check_route, check_timing};
