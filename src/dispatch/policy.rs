//! Ordering policies for the dispatch loop.

use crate::distance::DistanceOracle;
use crate::models::{Request, Vehicle};

/// The order in which requests are offered to the fleet.
///
/// All variants sort stably, so requests that compare equal keep their
/// input order and a dispatch run is fully deterministic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestOrder {
    /// By opening of the pickup window, earliest first.
    #[default]
    EarliestPickup,
    /// By fare, highest first. Favors revenue when the fleet is scarce.
    HighestCost,
    /// By pickup window width, narrowest first. Hard-to-place riders get
    /// first claim on the fleet.
    TightestWindow,
}

impl RequestOrder {
    pub(crate) fn sort(&self, requests: &mut [Request]) {
        match self {
            RequestOrder::EarliestPickup => requests
                .sort_by(|a, b| a.pickup().earliest().total_cmp(&b.pickup().earliest())),
            RequestOrder::HighestCost => {
                requests.sort_by(|a, b| b.cost().total_cmp(&a.cost()));
            }
            RequestOrder::TightestWindow => requests.sort_by(|a, b| {
                let wa = a.pickup().latest() - a.pickup().earliest();
                let wb = b.pickup().latest() - b.pickup().earliest();
                wa.total_cmp(&wb)
            }),
        }
    }
}

/// The order in which vehicles are tried for one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VehicleOrder {
    /// Fixed fleet order for every request.
    #[default]
    FleetOrder,
    /// Fleet order rotated by the request's offer index, spreading load
    /// across the fleet.
    RoundRobin,
    /// By expected distance to the pickup, closest first: each vehicle is
    /// ranked from wherever its schedule places it when the pickup window
    /// opens.
    NearestFirst,
}

impl VehicleOrder {
    /// Vehicle indices in the order they should be offered `request`.
    pub(crate) fn ranking(
        &self,
        offer_index: usize,
        request: &Request,
        vehicles: &[Vehicle],
        oracle: &DistanceOracle,
    ) -> Vec<usize> {
        let n = vehicles.len();
        if n == 0 {
            return Vec::new();
        }
        match self {
            VehicleOrder::FleetOrder => (0..n).collect(),
            VehicleOrder::RoundRobin => {
                let offset = offer_index % n;
                (0..n).map(|i| (i + offset) % n).collect()
            }
            VehicleOrder::NearestFirst => {
                let opens = request.pickup().earliest();
                let target = request.pickup().location();
                let mut order: Vec<usize> = (0..n).collect();
                order.sort_by(|&a, &b| {
                    let da = oracle.distance(vehicles[a].effective_location(opens), target);
                    let db = oracle.distance(vehicles[b].effective_location(opens), target);
                    da.total_cmp(&db)
                });
                order
            }
        }
    }
}
