//! System-wide scheduling parameters.

use serde::{Deserialize, Serialize};

/// Fixed parameters of a dial-a-ride run.
///
/// Times are minutes from the start of the operating day; distances are in
/// graph weight units (conventionally km). The defaults match a 24-hour day
/// at 2 minutes and 1 fare unit per km.
///
/// # Examples
///
/// ```
/// use u_dialride::models::Params;
///
/// let params = Params::default();
/// assert_eq!(params.day_end, 24.0 * 60.0);
/// assert_eq!(params.travel_time(5.0), 10.0);
///
/// let loaded: Params = serde_json::from_str(
///     r#"{ "minutes_per_unit": 1.5 }"#
/// ).unwrap();
/// assert_eq!(loaded.minutes_per_unit, 1.5);
/// assert_eq!(loaded.day_start, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Start of the operating day (minutes).
    pub day_start: f64,
    /// End of the operating day (minutes).
    pub day_end: f64,
    /// Minutes needed to travel one distance unit.
    pub minutes_per_unit: f64,
    /// Fare charged per direct-ride distance unit.
    pub rate_per_unit: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            day_start: 0.0,
            day_end: 24.0 * 60.0,
            minutes_per_unit: 2.0,
            rate_per_unit: 1.0,
        }
    }
}

impl Params {
    /// Travel time for a given shortest-path distance.
    ///
    /// Infinite distance stays infinite, so unreachable legs stay
    /// unreachable after conversion.
    pub fn travel_time(&self, distance: f64) -> f64 {
        distance * self.minutes_per_unit
    }

    /// Fare for a given direct-ride distance.
    pub fn fare(&self, distance: f64) -> f64 {
        distance * self.rate_per_unit
    }
}
