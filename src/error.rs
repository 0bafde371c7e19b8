//! Error taxonomy for dial-a-ride scheduling.
//!
//! Rejected insertion attempts are *not* errors; the engine reports those
//! as `Ok(false)` and moves on to the next candidate position or vehicle.
//! Errors cover malformed input at construction time and the fatal
//! [`InvariantViolation`] defect signal raised when a committed route fails
//! re-verification.

use crate::models::StopKind;

/// A route invariant broken by a *committed* schedule.
///
/// This is a programming-defect signal, not a capacity/timing rejection:
/// it means the insertion engine accepted a stop it should have refused.
/// Callers must halt scheduling rather than continue on a corrupted route.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    /// The gap between two adjacent stops is below the shortest travel time.
    #[error(
        "vehicle {vehicle_id}: travel from {from_location} to {to_location} \
         needs at least {required:.1} min but the schedule allows {observed:.1}"
    )]
    TravelTimeShortfall {
        /// Vehicle whose route is corrupted.
        vehicle_id: usize,
        /// Location of the earlier stop.
        from_location: usize,
        /// Location of the later stop.
        to_location: usize,
        /// Minimum travel time between the two locations.
        required: f64,
        /// Scheduled gap between the two actual times.
        observed: f64,
    },
    /// Running passenger count left the `0..=capacity` range.
    #[error(
        "vehicle {vehicle_id}: {count} passengers after stop {position} \
         (capacity {capacity})"
    )]
    CapacityExceeded {
        /// Vehicle whose route is corrupted.
        vehicle_id: usize,
        /// Index of the stop after which the count is wrong.
        position: usize,
        /// Observed running count.
        count: i32,
        /// Seat capacity of the vehicle.
        capacity: i32,
    },
    /// A stop is scheduled outside its time window.
    #[error(
        "vehicle {vehicle_id}: stop for request {request_id:?} scheduled at \
         {actual:.1}, outside window [{earliest:.1}, {latest:.1}]"
    )]
    WindowMissed {
        /// Vehicle whose route is corrupted.
        vehicle_id: usize,
        /// Request the stop belongs to (`None` for an origin stop).
        request_id: Option<usize>,
        /// Window lower bound.
        earliest: f64,
        /// Window upper bound.
        latest: f64,
        /// Scheduled time.
        actual: f64,
    },
    /// A drop appears without its pickup earlier in the sequence.
    #[error("vehicle {vehicle_id}: {kind:?} for request {request_id} at position {position} has no matching pickup before it")]
    DropBeforePickup {
        /// Vehicle whose route is corrupted.
        vehicle_id: usize,
        /// Request whose stops are mis-ordered.
        request_id: usize,
        /// Kind of the offending stop.
        kind: StopKind,
        /// Index of the offending stop.
        position: usize,
    },
}

/// Errors raised by graph, model construction, and scheduling.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DarpError {
    /// An edge weight was negative or non-finite.
    #[error("edge {from} -> {to} has invalid weight {weight}")]
    InvalidWeight {
        /// Edge tail.
        from: usize,
        /// Edge head.
        to: usize,
        /// Offending weight.
        weight: f64,
    },
    /// An edge endpoint lies outside the graph.
    #[error("vertex {vertex} out of range for a graph of {vertex_count} vertices")]
    VertexOutOfRange {
        /// Offending vertex id.
        vertex: usize,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },
    /// A stop's window has `earliest > latest` or a non-finite bound.
    #[error("invalid time window [{earliest}, {latest}]")]
    InvalidWindow {
        /// Window lower bound.
        earliest: f64,
        /// Window upper bound.
        latest: f64,
    },
    /// A request's deviation factor was below 1.
    #[error("deviation factor {factor} must be >= 1")]
    InvalidDeviation {
        /// Offending factor.
        factor: f64,
    },
    /// A vehicle was constructed with no seats.
    #[error("vehicle capacity {capacity} must be >= 1")]
    InvalidCapacity {
        /// Offending capacity.
        capacity: i32,
    },
    /// A request's drop location cannot be reached from its pickup.
    #[error("no path from pickup location {pickup} to drop location {drop}")]
    UnreachableRequest {
        /// Pickup location.
        pickup: usize,
        /// Drop location.
        drop: usize,
    },
    /// A committed route failed re-verification. Fatal.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}
