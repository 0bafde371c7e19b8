//! Ride request: a paired pickup and drop with derived windows and fare.

use crate::distance::DistanceOracle;
use crate::error::DarpError;

use super::params::Params;
use super::stop::{Stop, StopKind};

/// An immutable pickup/drop pair with a precomputed fare.
///
/// The rider names a pickup window; the drop window is derived from the
/// direct ride time. The drop opens one direct ride after the earliest
/// pickup and closes after `deviation_factor` direct rides (capped at the
/// end of the day), bounding how far the rider may be detoured.
///
/// # Examples
///
/// ```
/// use u_dialride::distance::{Digraph, DistanceOracle};
/// use u_dialride::models::{Params, Request};
///
/// let mut g = Digraph::new(3);
/// g.add_edge(1, 2, 5.0).unwrap();
/// let oracle = DistanceOracle::new(g);
/// let params = Params::default();
///
/// let r = Request::new(0, 1, 2, 0.0, 100.0, 2.0, &oracle, &params).unwrap();
/// // direct ride = 5 km * 2 min/km = 10 min
/// assert_eq!(r.drop().earliest(), 10.0);
/// assert_eq!(r.drop().latest(), 20.0);
/// assert_eq!(r.cost(), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    id: usize,
    pickup: Stop,
    drop: Stop,
    cost: f64,
}

impl Request {
    /// Builds a request, deriving the drop window from the pickup's.
    ///
    /// Fails with [`DarpError::InvalidDeviation`] if `deviation_factor < 1`,
    /// [`DarpError::UnreachableRequest`] if no path exists from pickup to
    /// drop, and [`DarpError::InvalidWindow`] if the pickup window is
    /// inverted or the derived drop window cannot fit before day end.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: usize,
        pickup_location: usize,
        drop_location: usize,
        earliest: f64,
        latest_pickup: f64,
        deviation_factor: f64,
        oracle: &DistanceOracle,
        params: &Params,
    ) -> Result<Self, DarpError> {
        if !deviation_factor.is_finite() || deviation_factor < 1.0 {
            return Err(DarpError::InvalidDeviation {
                factor: deviation_factor,
            });
        }
        let direct = oracle.distance(pickup_location, drop_location);
        if !direct.is_finite() {
            return Err(DarpError::UnreachableRequest {
                pickup: pickup_location,
                drop: drop_location,
            });
        }

        let pickup = Stop::new(
            pickup_location,
            earliest,
            latest_pickup,
            Some(id),
            StopKind::Pickup,
        )?;
        let ride_time = params.travel_time(direct);
        let drop = Stop::new(
            drop_location,
            earliest + ride_time,
            (earliest + deviation_factor * ride_time).min(params.day_end),
            Some(id),
            StopKind::Drop,
        )?;

        Ok(Self {
            id,
            pickup,
            drop,
            cost: params.fare(direct),
        })
    }

    /// Request id, assigned by the constructing collaborator.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The pickup stop template.
    pub fn pickup(&self) -> &Stop {
        &self.pickup
    }

    /// The drop stop template.
    pub fn drop(&self) -> &Stop {
        &self.drop
    }

    /// Revenue earned by servicing this request.
    pub fn cost(&self) -> f64 {
        self.cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::Digraph;

    fn sample_oracle() -> DistanceOracle {
        let mut g = Digraph::new(4);
        g.add_edge(1, 2, 5.0).expect("valid");
        g.add_edge(2, 3, 4.0).expect("valid");
        g.add_edge(1, 3, 12.0).expect("valid");
        DistanceOracle::new(g)
    }

    #[test]
    fn test_derived_drop_window() {
        let oracle = sample_oracle();
        let params = Params::default();
        let r = Request::new(0, 1, 3, 100.0, 200.0, 2.0, &oracle, &params).expect("valid");
        // shortest 1 -> 3 is 5 + 4 = 9 km, ride = 18 min
        assert_eq!(r.pickup().earliest(), 100.0);
        assert_eq!(r.pickup().latest(), 200.0);
        assert_eq!(r.drop().earliest(), 118.0);
        assert_eq!(r.drop().latest(), 136.0);
        assert_eq!(r.cost(), 9.0);
    }

    #[test]
    fn test_drop_window_capped_at_day_end() {
        let oracle = sample_oracle();
        let params = Params::default();
        let r = Request::new(0, 1, 3, 1420.0, 1430.0, 3.0, &oracle, &params).expect("valid");
        // 1420 + 3 * 18 = 1474, capped to 1440
        assert_eq!(r.drop().earliest(), 1438.0);
        assert_eq!(r.drop().latest(), 1440.0);
    }

    #[test]
    fn test_ride_past_day_end_rejected() {
        let oracle = sample_oracle();
        let params = Params::default();
        // Drop would open at 1448, after the capped 1440 close.
        let err =
            Request::new(0, 1, 3, 1430.0, 1435.0, 2.0, &oracle, &params).expect_err("no time");
        assert!(matches!(err, DarpError::InvalidWindow { .. }));
    }

    #[test]
    fn test_deviation_below_one_rejected() {
        let oracle = sample_oracle();
        let params = Params::default();
        let err = Request::new(0, 1, 2, 0.0, 50.0, 0.5, &oracle, &params).expect_err("deviation");
        assert_eq!(err, DarpError::InvalidDeviation { factor: 0.5 });
    }

    #[test]
    fn test_unreachable_drop_rejected() {
        let oracle = sample_oracle();
        let params = Params::default();
        // No edge into vertex 0.
        let err = Request::new(0, 1, 0, 0.0, 50.0, 2.0, &oracle, &params).expect_err("no path");
        assert_eq!(err, DarpError::UnreachableRequest { pickup: 1, drop: 0 });
    }

    #[test]
    fn test_deviation_factor_one_pins_direct_ride() {
        let oracle = sample_oracle();
        let params = Params::default();
        let r = Request::new(0, 1, 2, 50.0, 60.0, 1.0, &oracle, &params).expect("valid");
        assert_eq!(r.drop().earliest(), r.drop().latest());
        assert_eq!(r.drop().earliest(), 60.0);
    }

    #[test]
    fn test_cost_uses_rate() {
        let oracle = sample_oracle();
        let params = Params {
            rate_per_unit: 3.0,
            ..Params::default()
        };
        let r = Request::new(0, 1, 2, 0.0, 50.0, 2.0, &oracle, &params).expect("valid");
        assert_eq!(r.cost(), 15.0);
    }
}
