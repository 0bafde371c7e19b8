//! Route: the ordered stop sequence owned by one vehicle.

use super::stop::Stop;

/// An ordered sequence of stops, excluding the vehicle's origin stop
/// (conceptually position 0 of the augmented sequence).
///
/// A route is exclusively owned by its vehicle and mutated only by the
/// insertion engine. Trial insertions snapshot the whole stop sequence and
/// restore it on failure, so no intermediate state is ever observable.
///
/// # Examples
///
/// ```
/// use u_dialride::models::Route;
///
/// let route = Route::new();
/// assert!(route.is_empty());
/// assert_eq!(route.len(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    stops: Vec<Stop>,
}

impl Route {
    /// Creates an empty route.
    pub fn new() -> Self {
        Self { stops: Vec::new() }
    }

    /// Number of stops (excluding the origin).
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns `true` if no stops are scheduled.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// The scheduled stops in visiting order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// The stop at `position`, if any.
    pub fn get(&self, position: usize) -> Option<&Stop> {
        self.stops.get(position)
    }

    /// The last scheduled stop, if any.
    pub fn last(&self) -> Option<&Stop> {
        self.stops.last()
    }

    /// Running passenger count after serving the first `count` stops.
    pub fn passengers_after(&self, count: usize) -> i32 {
        self.stops[..count]
            .iter()
            .map(|s| s.passenger_delta())
            .sum()
    }

    /// An owned copy of the stop sequence, for transactional restore.
    pub fn snapshot(&self) -> Vec<Stop> {
        self.stops.clone()
    }

    pub(crate) fn restore(&mut self, snapshot: Vec<Stop>) {
        self.stops = snapshot;
    }

    pub(crate) fn insert(&mut self, position: usize, stop: Stop) {
        self.stops.insert(position, stop);
    }

    pub(crate) fn clear(&mut self) {
        self.stops.clear();
    }

    pub(crate) fn stop_mut(&mut self, position: usize) -> &mut Stop {
        &mut self.stops[position]
    }
}
