//! Greedy fleet dispatcher.

use rayon::prelude::*;
use tracing::debug;

use crate::distance::DistanceOracle;
use crate::error::DarpError;
use crate::evaluation::check_fleet;
use crate::insertion::Inserter;
use crate::models::{DispatchResult, Params, Request, Vehicle};

use super::policy::{RequestOrder, VehicleOrder};

/// Offers each request to the fleet and commits the first acceptance.
///
/// Requests are sorted once by the request policy, then offered one at a
/// time; vehicles are tried in the vehicle policy's order and the first
/// feasible insertion wins. A request every vehicle declines is recorded
/// as unserviced and never reconsidered.
///
/// With parallel search enabled the per-request feasibility probe runs
/// across the fleet on cloned vehicles, and the lowest-ranked acceptor is
/// committed afterwards, so the outcome is identical to the sequential
/// scan.
///
/// # Examples
///
/// ```
/// use u_dialride::dispatch::Dispatcher;
/// use u_dialride::distance::{Digraph, DistanceOracle};
/// use u_dialride::models::{Params, Request, Vehicle};
///
/// let mut g = Digraph::new(3);
/// g.add_edge(1, 2, 5.0).unwrap();
/// let oracle = DistanceOracle::new(g);
/// let params = Params::default();
///
/// let requests = vec![Request::new(0, 1, 2, 0.0, 100.0, 2.0, &oracle, &params).unwrap()];
/// let mut fleet = vec![Vehicle::new(0, 1, 4, &params).unwrap()];
///
/// let result = Dispatcher::new(&oracle, &params)
///     .dispatch(requests, &mut fleet)
///     .unwrap();
/// assert_eq!(result.serviced(), &[0]);
/// assert_eq!(result.revenue(), 5.0);
/// ```
pub struct Dispatcher<'a> {
    oracle: &'a DistanceOracle,
    params: &'a Params,
    request_order: RequestOrder,
    vehicle_order: VehicleOrder,
    parallel_search: bool,
}

impl<'a> Dispatcher<'a> {
    /// Creates a dispatcher with the default policies and sequential
    /// vehicle search.
    pub fn new(oracle: &'a DistanceOracle, params: &'a Params) -> Self {
        Self {
            oracle,
            params,
            request_order: RequestOrder::default(),
            vehicle_order: VehicleOrder::default(),
            parallel_search: false,
        }
    }

    /// Sets the order requests are offered in.
    pub fn with_request_order(mut self, order: RequestOrder) -> Self {
        self.request_order = order;
        self
    }

    /// Sets the order vehicles are tried in.
    pub fn with_vehicle_order(mut self, order: VehicleOrder) -> Self {
        self.vehicle_order = order;
        self
    }

    /// Probes the fleet in parallel per request. The committed schedule is
    /// the same as with the sequential scan.
    pub fn with_parallel_search(mut self, parallel: bool) -> Self {
        self.parallel_search = parallel;
        self
    }

    /// Runs the dispatch loop over `requests` and the fleet.
    ///
    /// `Err` means a committed route failed verification, which is a
    /// defect, not an unserviceable input; partial results are discarded.
    pub fn dispatch(
        &self,
        mut requests: Vec<Request>,
        vehicles: &mut [Vehicle],
    ) -> Result<DispatchResult, DarpError> {
        self.request_order.sort(&mut requests);
        let inserter = Inserter::new(self.oracle, self.params);
        let mut result = DispatchResult::new();

        for (offer_index, request) in requests.into_iter().enumerate() {
            let ranking = self
                .vehicle_order
                .ranking(offer_index, &request, vehicles, self.oracle);
            let accepted_by = if self.parallel_search {
                self.probe_parallel(&inserter, &request, &ranking, vehicles)?
            } else {
                self.probe_sequential(&inserter, &request, &ranking, vehicles)?
            };

            match accepted_by {
                Some(vehicle_id) => {
                    debug!(
                        request_id = request.id(),
                        vehicle_id,
                        cost = request.cost(),
                        "request serviced"
                    );
                    result.record_serviced(request.id(), request.cost());
                    if cfg!(debug_assertions) {
                        check_fleet(vehicles, self.oracle, self.params)?;
                    }
                }
                None => {
                    debug!(request_id = request.id(), "request unserviced");
                    result.record_unserviced(request);
                }
            }
        }

        debug!(
            serviced = result.num_serviced(),
            unserviced = result.num_unserviced(),
            revenue = result.revenue(),
            "dispatch complete"
        );
        Ok(result)
    }

    /// Tries vehicles one by one; commits into the first acceptor.
    fn probe_sequential(
        &self,
        inserter: &Inserter<'_>,
        request: &Request,
        ranking: &[usize],
        vehicles: &mut [Vehicle],
    ) -> Result<Option<usize>, DarpError> {
        for &idx in ranking {
            if inserter.try_insert_request(&mut vehicles[idx], request)? {
                return Ok(Some(vehicles[idx].id()));
            }
        }
        Ok(None)
    }

    /// Probes every vehicle on a clone concurrently, then commits into the
    /// lowest-ranked acceptor for the same outcome as the sequential scan.
    fn probe_parallel(
        &self,
        inserter: &Inserter<'_>,
        request: &Request,
        ranking: &[usize],
        vehicles: &mut [Vehicle],
    ) -> Result<Option<usize>, DarpError> {
        let fleet: &[Vehicle] = vehicles;
        let best_rank = ranking
            .par_iter()
            .enumerate()
            .map(|(rank, &idx)| -> Result<Option<usize>, DarpError> {
                let mut trial = fleet[idx].clone();
                Ok(inserter
                    .try_insert_request(&mut trial, request)?
                    .then_some(rank))
            })
            .try_reduce(
                || None,
                |a, b| {
                    Ok(match (a, b) {
                        (Some(x), Some(y)) => Some(x.min(y)),
                        (some, None) | (None, some) => some,
                    })
                },
            )?;

        match best_rank {
            Some(rank) => {
                let idx = ranking[rank];
                // The probe ran on an identical clone, so this re-insertion
                // must succeed; a refusal here is an engine defect surfaced
                // by the commit-time verification.
                inserter.try_insert_request(&mut vehicles[idx], request)?;
                Ok(Some(vehicles[idx].id()))
            }
            None => Ok(None),
        }
    }
}
