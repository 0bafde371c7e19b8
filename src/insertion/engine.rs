//! Greedy insertion of requests into vehicle schedules.

use tracing::{debug, trace};

use crate::distance::DistanceOracle;
use crate::error::DarpError;
use crate::evaluation::{check_route, check_timing};
use crate::models::{Params, Request, Stop, StopKind, Vehicle};

/// The route insertion engine.
///
/// Splices a request's pickup and drop into a vehicle's schedule at the
/// first feasible pair of positions, postponing already-scheduled stops
/// when the detour requires it. Mutation is transactional: a failed
/// attempt leaves the route exactly as it was.
///
/// The search is greedy with a single postponement cascade per candidate,
/// trading global optimality for linear-ish, explainable behavior.
///
/// # Examples
///
/// ```
/// use u_dialride::distance::{Digraph, DistanceOracle};
/// use u_dialride::insertion::Inserter;
/// use u_dialride::models::{Params, Request, Vehicle};
///
/// let mut g = Digraph::new(3);
/// g.add_edge(1, 2, 5.0).unwrap();
/// let oracle = DistanceOracle::new(g);
/// let params = Params::default();
///
/// let mut vehicle = Vehicle::new(0, 1, 1, &params).unwrap();
/// let request = Request::new(0, 1, 2, 0.0, 100.0, 2.0, &oracle, &params).unwrap();
///
/// let inserter = Inserter::new(&oracle, &params);
/// assert_eq!(inserter.try_insert_request(&mut vehicle, &request), Ok(true));
/// assert_eq!(vehicle.route().stops()[0].actual_time(), 0.0);
/// assert_eq!(vehicle.route().stops()[1].actual_time(), 10.0);
/// ```
pub struct Inserter<'a> {
    oracle: &'a DistanceOracle,
    params: &'a Params,
}

impl<'a> Inserter<'a> {
    /// Creates an engine bound to one problem's oracle and parameters.
    pub fn new(oracle: &'a DistanceOracle, params: &'a Params) -> Self {
        Self { oracle, params }
    }

    fn travel_time(&self, from: usize, to: usize) -> f64 {
        self.params.travel_time(self.oracle.distance(from, to))
    }

    /// Attempts to splice `request` into `vehicle`'s route.
    ///
    /// Returns `Ok(true)` and commits on success. On `Ok(false)` the route
    /// is byte-for-byte identical to its pre-call state. `Err` signals a
    /// post-commit invariant violation, a defect in this engine and fatal to
    /// the run.
    pub fn try_insert_request(
        &self,
        vehicle: &mut Vehicle,
        request: &Request,
    ) -> Result<bool, DarpError> {
        trace!(
            vehicle_id = vehicle.id(),
            request_id = request.id(),
            "trying insertion"
        );
        let pickup = request.pickup();
        let drop = request.drop();

        if vehicle.route().is_empty() {
            if self.insert_stop(vehicle, 0, pickup.clone())?
                && self.insert_stop(vehicle, 1, drop.clone())?
            {
                return self.commit(vehicle, request);
            }
            vehicle.route_mut().clear();
            return Ok(false);
        }

        let mut passengers = 0i32;
        'positions: for i in 0..=vehicle.route().len() {
            if i != 0 {
                passengers += vehicle.route().stops()[i - 1].passenger_delta();
            }
            // A full car cannot board another rider here; maybe somebody is
            // dropped further along.
            if passengers >= vehicle.capacity() {
                continue;
            }
            if let Some(next) = vehicle.route().get(i) {
                if pickup.earliest() > next.latest() {
                    continue;
                }
            }

            let snapshot = vehicle.route().snapshot();
            if !self.insert_stop(vehicle, i, pickup.clone())? {
                vehicle.route_mut().restore(snapshot);
                continue;
            }

            // Scan for a drop position, replaying the passenger count over
            // the segment that would sit between pickup and drop.
            let mut count = passengers;
            for k in (i + 1)..vehicle.route().len() {
                count += vehicle.route().stops()[k - 1].passenger_delta();
                if count > vehicle.capacity() {
                    // The new pickup elbows an earlier rider out somewhere
                    // before k; this pickup position is untenable.
                    vehicle.route_mut().restore(snapshot);
                    continue 'positions;
                }
                if self.insert_stop(vehicle, k, drop.clone())? {
                    return self.commit(vehicle, request);
                }
            }

            let end = vehicle.route().len();
            if self.insert_stop(vehicle, end, drop.clone())? {
                return self.commit(vehicle, request);
            }
            vehicle.route_mut().restore(snapshot);
        }
        Ok(false)
    }

    fn commit(&self, vehicle: &Vehicle, request: &Request) -> Result<bool, DarpError> {
        check_route(vehicle, self.oracle, self.params)?;
        debug!(
            vehicle_id = vehicle.id(),
            request_id = request.id(),
            stops = vehicle.route().len(),
            "request inserted"
        );
        Ok(true)
    }

    /// The feasibility primitive: tries to place one stop at `position`.
    ///
    /// On success the stop is spliced in with its `actual_time` set to the
    /// earliest reachable moment inside its window (the vehicle may wait,
    /// never arrive early), downstream stops are postponed if needed, and
    /// the whole route's timing is re-verified. `Ok(false)` leaves the
    /// route untouched.
    pub fn insert_stop(
        &self,
        vehicle: &mut Vehicle,
        position: usize,
        mut stop: Stop,
    ) -> Result<bool, DarpError> {
        let route_len = vehicle.route().len();
        if position > route_len {
            return Ok(false);
        }

        if position == 0 {
            // A drop can never be the very first event of a schedule.
            debug_assert_eq!(stop.kind(), StopKind::Pickup);
            let origin = vehicle.origin();
            let arrival =
                origin.actual_time() + self.travel_time(origin.location(), stop.location());
            if arrival > stop.latest() {
                trace!(
                    vehicle_id = vehicle.id(),
                    location = stop.location(),
                    "unreachable before window closes"
                );
                return Ok(false);
            }
            stop.set_actual_time(arrival.max(stop.earliest()));

            let successor = vehicle.route().get(0).map(|n| (n.location(), n.actual_time()));
            if let Some((next_location, next_at)) = successor {
                let reach = stop.actual_time() + self.travel_time(stop.location(), next_location);
                if reach > next_at
                    && !self.postpone_from(vehicle, 0, stop.location(), stop.actual_time())
                {
                    trace!(vehicle_id = vehicle.id(), "cannot postpone scheduled stops");
                    return Ok(false);
                }
            }
        } else if position == route_len {
            let prev = vehicle.route().last().expect("append implies non-empty");
            if prev.actual_time() > stop.latest() {
                return Ok(false);
            }
            let arrival = prev.actual_time() + self.travel_time(prev.location(), stop.location());
            if arrival > stop.latest() {
                return Ok(false);
            }
            stop.set_actual_time(arrival.max(stop.earliest()));
        } else {
            let prev = &vehicle.route().stops()[position - 1];
            let next = &vehicle.route().stops()[position];
            if prev.actual_time() > stop.latest() {
                return Ok(false);
            }
            // Two simultaneous co-located events leave no room for a detour
            // between them.
            if prev.location() == next.location() && prev.actual_time() == next.actual_time() {
                return Ok(false);
            }
            let arrival = prev.actual_time() + self.travel_time(prev.location(), stop.location());
            if arrival > stop.latest() {
                return Ok(false);
            }
            let at = arrival.max(stop.earliest());
            let reach = at + self.travel_time(stop.location(), next.location());
            if reach > next.latest() {
                return Ok(false);
            }
            let needs_postpone = reach > next.actual_time();
            stop.set_actual_time(at);
            if needs_postpone && !self.postpone_from(vehicle, position, stop.location(), at) {
                return Ok(false);
            }
        }

        vehicle.route_mut().insert(position, stop);
        check_timing(vehicle, self.oracle, self.params)?;
        Ok(true)
    }

    /// Dry-run of a postponement cascade from `start`: walks the tail
    /// recomputing arrivals without mutating, failing if any window would
    /// be missed. Arrivals never move earlier than currently scheduled.
    fn can_postpone(
        &self,
        vehicle: &Vehicle,
        start: usize,
        mut prev_location: usize,
        mut prev_at: f64,
    ) -> bool {
        for stop in &vehicle.route().stops()[start..] {
            let arrival = prev_at + self.travel_time(prev_location, stop.location());
            if arrival > stop.latest() {
                return false;
            }
            prev_at = arrival.max(stop.earliest()).max(stop.actual_time());
            prev_location = stop.location();
        }
        true
    }

    /// Commits the cascade simulated by [`Self::can_postpone`]; returns
    /// `false` without mutating when the tail is infeasible.
    fn postpone_from(
        &self,
        vehicle: &mut Vehicle,
        start: usize,
        mut prev_location: usize,
        mut prev_at: f64,
    ) -> bool {
        if !self.can_postpone(vehicle, start, prev_location, prev_at) {
            return false;
        }
        for i in start..vehicle.route().len() {
            let stop = &vehicle.route().stops()[i];
            let at = (prev_at + self.travel_time(prev_location, stop.location()))
                .max(stop.earliest())
                .max(stop.actual_time());
            prev_location = stop.location();
            prev_at = at;
            vehicle.route_mut().stop_mut(i).set_actual_time(at);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::Digraph;
    use crate::evaluation::check_route;
    use crate::models::Route;

    /// Locations 1..=4 on a line, 5 km between neighbors, both directions.
    /// At 2 min/km every hop is 10 minutes.
    fn line_oracle() -> DistanceOracle {
        let mut g = Digraph::new(5);
        for (a, b) in [(1, 2), (2, 3), (3, 4)] {
            g.add_edge(a, b, 5.0).expect("valid");
            g.add_edge(b, a, 5.0).expect("valid");
        }
        DistanceOracle::new(g)
    }

    fn request(
        id: usize,
        pickup: usize,
        drop: usize,
        earliest: f64,
        latest: f64,
        deviation: f64,
        oracle: &DistanceOracle,
        params: &Params,
    ) -> Request {
        Request::new(id, pickup, drop, earliest, latest, deviation, oracle, params)
            .expect("valid request")
    }

    fn times(vehicle: &Vehicle) -> Vec<f64> {
        vehicle
            .route()
            .stops()
            .iter()
            .map(|s| s.actual_time())
            .collect()
    }

    #[test]
    fn test_single_request_direct_ride() {
        let mut g = Digraph::new(3);
        g.add_edge(1, 2, 5.0).expect("valid");
        let oracle = DistanceOracle::new(g);
        let params = Params::default();
        let mut vehicle = Vehicle::new(0, 1, 1, &params).expect("valid");
        let r = request(0, 1, 2, 0.0, 100.0, 2.0, &oracle, &params);

        let inserter = Inserter::new(&oracle, &params);
        assert_eq!(inserter.try_insert_request(&mut vehicle, &r), Ok(true));
        assert_eq!(vehicle.route().len(), 2);
        assert_eq!(vehicle.route().stops()[0].kind(), StopKind::Pickup);
        assert_eq!(vehicle.route().stops()[0].actual_time(), 0.0);
        assert_eq!(vehicle.route().stops()[1].kind(), StopKind::Drop);
        assert_eq!(vehicle.route().stops()[1].actual_time(), 10.0);
        assert_eq!(r.cost(), 5.0);
        assert!(check_route(&vehicle, &oracle, &params).is_ok());
    }

    #[test]
    fn test_vehicle_waits_for_window_open() {
        let oracle = line_oracle();
        let params = Params::default();
        let mut vehicle = Vehicle::new(0, 1, 1, &params).expect("valid");
        // Pickup one hop away (10 min) but window opens at 60.
        let r = request(0, 2, 3, 60.0, 120.0, 2.0, &oracle, &params);

        let inserter = Inserter::new(&oracle, &params);
        assert_eq!(inserter.try_insert_request(&mut vehicle, &r), Ok(true));
        assert_eq!(times(&vehicle), vec![60.0, 70.0]);
    }

    #[test]
    fn test_unreachable_pickup_rejected() {
        let mut g = Digraph::new(3);
        g.add_edge(1, 2, 5.0).expect("valid");
        g.add_edge(2, 1, 5.0).expect("valid");
        let oracle = DistanceOracle::new(g);
        let params = Params::default();
        // Vehicle parked at an isolated vertex.
        let mut vehicle = Vehicle::new(0, 0, 1, &params).expect("valid");
        let r = request(0, 1, 2, 0.0, 1000.0, 2.0, &oracle, &params);

        let inserter = Inserter::new(&oracle, &params);
        assert_eq!(inserter.try_insert_request(&mut vehicle, &r), Ok(false));
        assert!(vehicle.route().is_empty());
    }

    #[test]
    fn test_infeasible_drop_window_clears_degenerate_route() {
        let oracle = line_oracle();
        let params = Params::default();
        let mut vehicle = Vehicle::new(0, 1, 1, &params).expect("valid");
        // deviation 1 pins the drop to the direct ride from the earliest
        // pickup, but the vehicle needs 10 minutes to reach the pickup
        // first: drop would land at 20, window closes at 10.
        let r = request(0, 2, 3, 0.0, 100.0, 1.0, &oracle, &params);

        let inserter = Inserter::new(&oracle, &params);
        assert_eq!(inserter.try_insert_request(&mut vehicle, &r), Ok(false));
        assert!(vehicle.route().is_empty());
    }

    #[test]
    fn test_capacity_one_rejects_overlapping_request() {
        let oracle = line_oracle();
        let params = Params::default();
        let mut vehicle = Vehicle::new(0, 1, 1, &params).expect("valid");
        let inserter = Inserter::new(&oracle, &params);

        let first = request(0, 2, 3, 0.0, 200.0, 4.0, &oracle, &params);
        assert_eq!(inserter.try_insert_request(&mut vehicle, &first), Ok(true));
        let before = vehicle.route().clone();

        // Same ride, but the pickup window closes before the first rider
        // is dropped, so the two riders would have to share the seat.
        let second = request(1, 2, 3, 0.0, 15.0, 4.0, &oracle, &params);
        assert_eq!(
            inserter.try_insert_request(&mut vehicle, &second),
            Ok(false)
        );
        assert_eq!(vehicle.route(), &before);
    }

    #[test]
    fn test_capacity_two_shares_the_ride() {
        let oracle = line_oracle();
        let params = Params::default();
        let mut vehicle = Vehicle::new(0, 1, 2, &params).expect("valid");
        let inserter = Inserter::new(&oracle, &params);

        let first = request(0, 2, 3, 0.0, 200.0, 4.0, &oracle, &params);
        let second = request(1, 2, 3, 0.0, 15.0, 4.0, &oracle, &params);
        assert_eq!(inserter.try_insert_request(&mut vehicle, &first), Ok(true));
        assert_eq!(inserter.try_insert_request(&mut vehicle, &second), Ok(true));
        assert_eq!(vehicle.route().len(), 4);
        assert!(check_route(&vehicle, &oracle, &params).is_ok());
    }

    #[test]
    fn test_insertion_postpones_later_stops() {
        let oracle = line_oracle();
        let params = Params::default();
        let mut vehicle = Vehicle::new(0, 1, 2, &params).expect("valid");
        let inserter = Inserter::new(&oracle, &params);

        let first = request(0, 2, 3, 0.0, 200.0, 4.0, &oracle, &params);
        assert_eq!(inserter.try_insert_request(&mut vehicle, &first), Ok(true));
        assert_eq!(times(&vehicle), vec![10.0, 20.0]);

        // Second pickup at the same corner, window opening at 15: serving
        // it first postpones the whole tail.
        let second = request(1, 2, 3, 15.0, 30.0, 2.0, &oracle, &params);
        assert_eq!(inserter.try_insert_request(&mut vehicle, &second), Ok(true));
        assert_eq!(times(&vehicle), vec![15.0, 15.0, 25.0, 25.0]);
        let ids: Vec<Option<usize>> = vehicle
            .route()
            .stops()
            .iter()
            .map(|s| s.request_id())
            .collect();
        assert_eq!(ids, vec![Some(1), Some(0), Some(1), Some(0)]);
        assert!(check_route(&vehicle, &oracle, &params).is_ok());
    }

    #[test]
    fn test_postponement_never_moves_stops_earlier() {
        let oracle = line_oracle();
        let params = Params::default();
        let mut vehicle = Vehicle::new(0, 1, 2, &params).expect("valid");
        let inserter = Inserter::new(&oracle, &params);

        let first = request(0, 2, 3, 0.0, 200.0, 4.0, &oracle, &params);
        assert_eq!(inserter.try_insert_request(&mut vehicle, &first), Ok(true));
        let before = times(&vehicle);
        let ids_before: Vec<Option<usize>> = vehicle
            .route()
            .stops()
            .iter()
            .map(|s| s.request_id())
            .collect();

        let second = request(1, 2, 3, 15.0, 30.0, 2.0, &oracle, &params);
        assert_eq!(inserter.try_insert_request(&mut vehicle, &second), Ok(true));

        // Every surviving stop of the first request kept or increased its
        // scheduled time.
        for (id, &t_before) in ids_before.iter().zip(&before) {
            let t_after = vehicle
                .route()
                .stops()
                .iter()
                .find(|s| s.request_id() == *id && s.actual_time() >= t_before)
                .map(|s| s.actual_time());
            assert!(t_after.is_some(), "stop of request {id:?} moved earlier");
        }
    }

    #[test]
    fn test_failed_postponement_leaves_route_unchanged() {
        let oracle = line_oracle();
        let params = Params::default();
        let mut vehicle = Vehicle::new(0, 1, 2, &params).expect("valid");
        let inserter = Inserter::new(&oracle, &params);

        // First rider: pickup opens at 10, deviation 1 pins the drop at 20.
        let first = request(0, 2, 3, 10.0, 200.0, 1.0, &oracle, &params);
        assert_eq!(inserter.try_insert_request(&mut vehicle, &first), Ok(true));
        assert_eq!(times(&vehicle), vec![10.0, 20.0]);
        let before = vehicle.route().clone();

        // Second rider wants the same corner at 15; any placement either
        // postpones the pinned drop past its window or misses its own.
        let second = request(1, 2, 3, 15.0, 30.0, 2.0, &oracle, &params);
        assert_eq!(
            inserter.try_insert_request(&mut vehicle, &second),
            Ok(false)
        );
        assert_eq!(vehicle.route(), &before);
    }

    #[test]
    fn test_request_appended_after_existing_ride() {
        let oracle = line_oracle();
        let params = Params::default();
        let mut vehicle = Vehicle::new(0, 1, 1, &params).expect("valid");
        let inserter = Inserter::new(&oracle, &params);

        let first = request(0, 2, 3, 0.0, 200.0, 4.0, &oracle, &params);
        assert_eq!(inserter.try_insert_request(&mut vehicle, &first), Ok(true));

        // Second ride starts where the first ended; fits sequentially even
        // on a one-seat vehicle.
        let second = request(1, 3, 4, 0.0, 200.0, 8.0, &oracle, &params);
        assert_eq!(inserter.try_insert_request(&mut vehicle, &second), Ok(true));
        assert_eq!(times(&vehicle), vec![10.0, 20.0, 20.0, 30.0]);
        assert!(check_route(&vehicle, &oracle, &params).is_ok());
    }

    #[test]
    fn test_insert_stop_rejects_out_of_range_position() {
        let oracle = line_oracle();
        let params = Params::default();
        let mut vehicle = Vehicle::new(0, 1, 1, &params).expect("valid");
        let inserter = Inserter::new(&oracle, &params);
        let r = request(0, 2, 3, 0.0, 100.0, 2.0, &oracle, &params);
        assert_eq!(
            inserter.insert_stop(&mut vehicle, 1, r.pickup().clone()),
            Ok(false)
        );
    }

    #[test]
    fn test_insert_stop_rejects_between_colocated_simultaneous_stops() {
        let oracle = line_oracle();
        let params = Params::default();
        let mut vehicle = Vehicle::new(0, 1, 2, &params).expect("valid");
        let inserter = Inserter::new(&oracle, &params);

        // Two pickups at location 2 scheduled at the same minute.
        let first = request(0, 2, 3, 0.0, 200.0, 4.0, &oracle, &params);
        let second = request(1, 2, 4, 0.0, 200.0, 4.0, &oracle, &params);
        assert_eq!(inserter.try_insert_request(&mut vehicle, &first), Ok(true));
        assert_eq!(inserter.try_insert_request(&mut vehicle, &second), Ok(true));
        assert_eq!(vehicle.route().stops()[0].location(), 2);
        assert_eq!(vehicle.route().stops()[1].location(), 2);
        assert_eq!(
            vehicle.route().stops()[0].actual_time(),
            vehicle.route().stops()[1].actual_time()
        );

        // A stop spliced between two simultaneous co-located events is
        // rejected as degenerate regardless of its own window.
        let probe = request(2, 2, 3, 0.0, 200.0, 4.0, &oracle, &params);
        assert_eq!(
            inserter.insert_stop(&mut vehicle, 1, probe.pickup().clone()),
            Ok(false)
        );
    }

    #[test]
    fn test_pickup_position_skipped_when_successor_window_precedes() {
        let oracle = line_oracle();
        let params = Params::default();
        let mut vehicle = Vehicle::new(0, 1, 2, &params).expect("valid");
        let inserter = Inserter::new(&oracle, &params);

        // Existing ride must finish by 40.
        let first = request(0, 2, 3, 10.0, 20.0, 2.0, &oracle, &params);
        assert_eq!(inserter.try_insert_request(&mut vehicle, &first), Ok(true));

        // New rider's window opens after every existing stop has closed;
        // the only viable pickup slot is at the tail.
        let second = request(1, 3, 4, 100.0, 200.0, 4.0, &oracle, &params);
        assert_eq!(inserter.try_insert_request(&mut vehicle, &second), Ok(true));
        assert_eq!(
            vehicle.route().stops()[2].request_id(),
            Some(1),
            "late rider appended after the earlier ride"
        );
        assert!(check_route(&vehicle, &oracle, &params).is_ok());
    }

    #[test]
    fn test_failure_is_transactional_for_stop_times() {
        let oracle = line_oracle();
        let params = Params::default();
        let mut vehicle = Vehicle::new(0, 1, 3, &params).expect("valid");
        let inserter = Inserter::new(&oracle, &params);

        for (id, (from, to, et, lt)) in [(1, 2, 0.0, 200.0), (2, 3, 0.0, 300.0)]
            .into_iter()
            .enumerate()
        {
            let r = request(id, from, to, et, lt, 4.0, &oracle, &params);
            assert_eq!(inserter.try_insert_request(&mut vehicle, &r), Ok(true));
        }
        let before = vehicle.route().clone();

        // Ride ending at an unreachable-in-time corner: rejected.
        let bad = request(9, 4, 1, 0.0, 5.0, 1.0, &oracle, &params);
        assert_eq!(inserter.try_insert_request(&mut vehicle, &bad), Ok(false));
        assert_eq!(vehicle.route(), &before);
        assert_eq!(times(&vehicle), times_of(&before));
    }

    fn times_of(route: &Route) -> Vec<f64> {
        route.stops().iter().map(|s| s.actual_time()).collect()
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_failed_insertions_leave_routes_untouched(
                rides in proptest::collection::vec(
                    (1usize..=4, 1usize..=4, 0.0f64..600.0, 10.0f64..300.0, 1.0f64..3.0),
                    1..12,
                ),
                capacity in 1i32..=3,
                start in 1usize..=4,
            ) {
                let oracle = line_oracle();
                let params = Params::default();
                let inserter = Inserter::new(&oracle, &params);
                let mut vehicle = Vehicle::new(0, start, capacity, &params).expect("valid");

                for (id, (from, to, earliest, window, dev)) in rides.into_iter().enumerate() {
                    if from == to {
                        continue;
                    }
                    let r = request(id, from, to, earliest, earliest + window, dev, &oracle, &params);
                    let before = vehicle.route().clone();
                    let accepted = inserter
                        .try_insert_request(&mut vehicle, &r)
                        .expect("committed route broke an invariant");
                    if !accepted {
                        prop_assert_eq!(vehicle.route(), &before);
                    }
                    prop_assert!(check_route(&vehicle, &oracle, &params).is_ok());
                }
            }
        }
    }
}

