//! Greedy route insertion.
//!
//! The insertion engine splices a request's pickup/drop pair into an
//! existing schedule at the first feasible pair of positions, postponing
//! downstream stops when the detour requires it. Failed attempts are
//! transactional and leave the route untouched.

mod engine;

pub use engine::Inserter;
