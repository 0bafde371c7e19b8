//! Stop and stop-kind types.

use crate::error::DarpError;

/// What happens at a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopKind {
    /// A rider boards.
    Pickup,
    /// A rider alights.
    Drop,
    /// A vehicle's start-of-day position; only ever the head of a route.
    Origin,
}

impl StopKind {
    /// Change in on-board passenger count when this stop is served.
    pub fn passenger_delta(&self) -> i32 {
        match self {
            StopKind::Pickup => 1,
            StopKind::Drop => -1,
            StopKind::Origin => 0,
        }
    }
}

/// A single pickup, drop, or vehicle-origin event.
///
/// The window `[earliest, latest]` is fixed at creation. `actual_time` is
/// the scheduled service time: it starts at `earliest` and only ever moves
/// later as insertions postpone the schedule around it. For any committed
/// stop, `earliest <= actual_time <= latest` holds.
///
/// # Examples
///
/// ```
/// use u_dialride::models::{Stop, StopKind};
///
/// let s = Stop::new(4, 30.0, 90.0, Some(0), StopKind::Pickup).unwrap();
/// assert_eq!(s.actual_time(), 30.0);
/// assert_eq!(s.passenger_delta(), 1);
///
/// assert!(Stop::new(4, 90.0, 30.0, Some(0), StopKind::Pickup).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    location: usize,
    earliest: f64,
    latest: f64,
    actual_time: f64,
    request_id: Option<usize>,
    kind: StopKind,
}

impl Stop {
    /// Creates a stop with `actual_time` initialized to `earliest`.
    ///
    /// Fails with [`DarpError::InvalidWindow`] if `earliest > latest` or
    /// either bound is non-finite.
    pub fn new(
        location: usize,
        earliest: f64,
        latest: f64,
        request_id: Option<usize>,
        kind: StopKind,
    ) -> Result<Self, DarpError> {
        if !earliest.is_finite() || !latest.is_finite() || earliest > latest {
            return Err(DarpError::InvalidWindow { earliest, latest });
        }
        Ok(Self {
            location,
            earliest,
            latest,
            actual_time: earliest,
            request_id,
            kind,
        })
    }

    /// Creates a vehicle-origin stop pinned at `time`.
    pub fn origin(location: usize, time: f64) -> Self {
        Self {
            location,
            earliest: time,
            latest: time,
            actual_time: time,
            request_id: None,
            kind: StopKind::Origin,
        }
    }

    /// Location vertex of this stop.
    pub fn location(&self) -> usize {
        self.location
    }

    /// Earliest allowed service time.
    pub fn earliest(&self) -> f64 {
        self.earliest
    }

    /// Latest allowed service time.
    pub fn latest(&self) -> f64 {
        self.latest
    }

    /// Currently scheduled service time.
    pub fn actual_time(&self) -> f64 {
        self.actual_time
    }

    /// Request this stop belongs to; `None` for an origin stop.
    pub fn request_id(&self) -> Option<usize> {
        self.request_id
    }

    /// Kind of event at this stop.
    pub fn kind(&self) -> StopKind {
        self.kind
    }

    /// Change in on-board passenger count when this stop is served.
    pub fn passenger_delta(&self) -> i32 {
        self.kind.passenger_delta()
    }

    pub(crate) fn set_actual_time(&mut self, at: f64) {
        self.actual_time = at;
    }
}
