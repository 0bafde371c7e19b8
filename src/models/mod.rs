//! Domain model types for dial-a-ride scheduling.
//!
//! Provides the core abstractions: stops with time windows, paired
//! pickup/drop requests, capacitated vehicles owning routes, the run
//! parameters, and the dispatch outcome.

mod params;
mod request;
mod result;
mod route;
mod stop;
mod vehicle;

pub use params::Params;
pub use request::Request;
pub use result::DispatchResult;
pub use route::Route;
pub use stop::{Stop, StopKind};
pub use vehicle::Vehicle;
