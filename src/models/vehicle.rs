//! Vehicle: identity, capacity, origin stop, and its owned route.

use crate::distance::DistanceOracle;
use crate::error::DarpError;

use super::params::Params;
use super::route::Route;
use super::stop::Stop;

/// A capacitated vehicle with a fixed start-of-day position.
///
/// Ids are assigned by the constructing collaborator (the input loader or
/// dispatcher), scoped to one run.
///
/// # Examples
///
/// ```
/// use u_dialride::models::{Params, Vehicle};
///
/// let params = Params::default();
/// let v = Vehicle::new(0, 3, 4, &params).unwrap();
/// assert_eq!(v.capacity(), 4);
/// assert_eq!(v.origin().location(), 3);
/// assert!(v.route().is_empty());
///
/// assert!(Vehicle::new(1, 3, 0, &params).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Vehicle {
    id: usize,
    capacity: i32,
    origin: Stop,
    route: Route,
}

impl Vehicle {
    /// Creates a vehicle parked at `start_location` from the start of day.
    ///
    /// Fails with [`DarpError::InvalidCapacity`] unless `capacity >= 1`.
    pub fn new(
        id: usize,
        start_location: usize,
        capacity: i32,
        params: &Params,
    ) -> Result<Self, DarpError> {
        if capacity < 1 {
            return Err(DarpError::InvalidCapacity { capacity });
        }
        Ok(Self {
            id,
            capacity,
            origin: Stop::origin(start_location, params.day_start),
            route: Route::new(),
        })
    }

    /// Vehicle id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Seat capacity.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// The fixed start-of-day stop.
    pub fn origin(&self) -> &Stop {
        &self.origin
    }

    /// The vehicle's schedule.
    pub fn route(&self) -> &Route {
        &self.route
    }

    pub(crate) fn route_mut(&mut self) -> &mut Route {
        &mut self.route
    }

    /// Where this vehicle is expected to be at `time`: the location of its
    /// last stop scheduled at or before `time`, or its origin if the route
    /// is empty or `time` precedes the first stop.
    pub fn effective_location(&self, time: f64) -> usize {
        self.route
            .stops()
            .iter()
            .take_while(|s| s.actual_time() <= time)
            .last()
            .map_or(self.origin.location(), |s| s.location())
    }

    /// Total shortest-path distance along the scheduled route.
    pub fn distance_travelled(&self, oracle: &DistanceOracle) -> f64 {
        let mut distance = 0.0;
        let mut prev = self.origin.location();
        for stop in self.route.stops() {
            distance += oracle.distance(prev, stop.location());
            prev = stop.location();
        }
        distance
    }

    /// Minutes this vehicle spends waiting: slack between consecutive stops
    /// beyond the required travel time, plus the tail of the day after the
    /// last stop. An unused vehicle idles for the whole day.
    pub fn idle_time(&self, oracle: &DistanceOracle, params: &Params) -> f64 {
        let mut idle = 0.0;
        let mut prev = &self.origin;
        for stop in self.route.stops() {
            let travel = params.travel_time(oracle.distance(prev.location(), stop.location()));
            idle += stop.actual_time() - prev.actual_time() - travel;
            prev = stop;
        }
        idle + (params.day_end - prev.actual_time())
    }
}
