//! Fleet dispatch: offering requests to vehicles.
//!
//! The dispatcher walks the request list once, in policy order, and asks
//! the insertion engine to place each request into the first willing
//! vehicle. Rejected requests are final; there is no backtracking across
//! requests.

mod dispatcher;
mod policy;

pub use dispatcher::Dispatcher;
pub use policy::{RequestOrder, VehicleOrder};
