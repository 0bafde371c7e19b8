//! Post-hoc route verification.

use std::collections::HashSet;

use crate::distance::DistanceOracle;
use crate::error::InvariantViolation;
use crate::models::{Params, StopKind, Vehicle};

/// Slack for floating-point gap comparisons; keeps accumulated rounding in
/// long schedules from masquerading as a corrupted route.
const TIME_EPS: f64 = 1e-9;

/// Verifies timing only: every adjacent gap in the augmented sequence
/// covers the shortest travel time, and every stop sits inside its window.
///
/// The insertion engine runs this after each splice. Capacity is checked
/// separately because a pickup may transiently overfill the vehicle while
/// its drop position is still being searched.
pub fn check_timing(
    vehicle: &Vehicle,
    oracle: &DistanceOracle,
    params: &Params,
) -> Result<(), InvariantViolation> {
    let mut prev = vehicle.origin();
    for stop in vehicle.route().stops() {
        let required = params.travel_time(oracle.distance(prev.location(), stop.location()));
        let observed = stop.actual_time() - prev.actual_time();
        if observed + TIME_EPS < required {
            return Err(InvariantViolation::TravelTimeShortfall {
                vehicle_id: vehicle.id(),
                from_location: prev.location(),
                to_location: stop.location(),
                required,
                observed,
            });
        }
        if stop.actual_time() + TIME_EPS < stop.earliest()
            || stop.actual_time() > stop.latest() + TIME_EPS
        {
            return Err(InvariantViolation::WindowMissed {
                vehicle_id: vehicle.id(),
                request_id: stop.request_id(),
                earliest: stop.earliest(),
                latest: stop.latest(),
                actual: stop.actual_time(),
            });
        }
        prev = stop;
    }
    Ok(())
}

/// Re-derives every route invariant from scratch: travel-time gaps, window
/// containment, running passenger count within `0..=capacity`, and pickup
/// preceding drop for every request.
///
/// A violation here is a defect in the insertion logic, never a normal
/// "could not serve" outcome; callers must halt instead of continuing on
/// the corrupted schedule.
///
/// # Examples
///
/// ```
/// use u_dialride::distance::{Digraph, DistanceOracle};
/// use u_dialride::evaluation::check_route;
/// use u_dialride::models::{Params, Vehicle};
///
/// let oracle = DistanceOracle::new(Digraph::new(2));
/// let params = Params::default();
/// let vehicle = Vehicle::new(0, 1, 4, &params).unwrap();
/// assert!(check_route(&vehicle, &oracle, &params).is_ok());
/// ```
pub fn check_route(
    vehicle: &Vehicle,
    oracle: &DistanceOracle,
    params: &Params,
) -> Result<(), InvariantViolation> {
    check_timing(vehicle, oracle, params)?;

    let mut passengers = 0i32;
    let mut picked_up: HashSet<usize> = HashSet::new();
    for (position, stop) in vehicle.route().stops().iter().enumerate() {
        match (stop.kind(), stop.request_id()) {
            (StopKind::Pickup, Some(id)) => {
                picked_up.insert(id);
            }
            (StopKind::Drop, Some(id)) => {
                if !picked_up.contains(&id) {
                    return Err(InvariantViolation::DropBeforePickup {
                        vehicle_id: vehicle.id(),
                        request_id: id,
                        kind: stop.kind(),
                        position,
                    });
                }
            }
            // Origin stops never appear inside a route; a request stop
            // without an id would be a construction bug upstream.
            _ => {}
        }
        passengers += stop.passenger_delta();
        if passengers > vehicle.capacity() || passengers < 0 {
            return Err(InvariantViolation::CapacityExceeded {
                vehicle_id: vehicle.id(),
                position,
                count: passengers,
                capacity: vehicle.capacity(),
            });
        }
    }
    Ok(())
}

/// Runs [`check_route`] over every vehicle, stopping at the first failure.
pub fn check_fleet(
    vehicles: &[Vehicle],
    oracle: &DistanceOracle,
    params: &Params,
) -> Result<(), InvariantViolation> {
    for vehicle in vehicles {
        check_route(vehicle, oracle, params)?;
    }
    Ok(())
}
