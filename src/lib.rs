//! # u-dialride
//!
//! Static dial-a-ride scheduling library: capacitated vehicles, paired
//! pickup/drop requests with time windows, and a greedy first-fit
//! insertion dispatcher maximizing serviced revenue.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Stop, Request, Vehicle, Route, Params, DispatchResult)
//! - [`distance`] — Directed graph, Dijkstra, and the cached distance oracle
//! - [`insertion`] — Transactional route insertion with postponement
//! - [`dispatch`] — Fleet dispatcher and request/vehicle ordering policies
//! - [`evaluation`] — Route invariant verification
//! - [`error`] — Error and invariant-violation types

pub mod dispatch;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod insertion;
pub mod models;
