//! Dispatch run outcome.

use super::request::Request;

/// The aggregate outcome of one dispatch run.
///
/// Immutable once the dispatch loop completes: total revenue, the ids of
/// serviced requests, and the requests no vehicle could accommodate, in
/// offer order.
#[derive(Debug, Clone, Default)]
pub struct DispatchResult {
    revenue: f64,
    serviced: Vec<usize>,
    unserviced: Vec<Request>,
}

impl DispatchResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total revenue over serviced requests.
    pub fn revenue(&self) -> f64 {
        self.revenue
    }

    /// Ids of serviced requests, in service order.
    pub fn serviced(&self) -> &[usize] {
        &self.serviced
    }

    /// Requests no vehicle accepted, in offer order.
    pub fn unserviced(&self) -> &[Request] {
        &self.unserviced
    }

    /// Number of serviced requests.
    pub fn num_serviced(&self) -> usize {
        self.serviced.len()
    }

    /// Number of unserviced requests.
    pub fn num_unserviced(&self) -> usize {
        self.unserviced.len()
    }

    /// Revenue if every offered request had been serviced.
    pub fn max_revenue(requests: &[Request]) -> f64 {
        requests.iter().map(|r| r.cost()).sum()
    }

    pub(crate) fn record_serviced(&mut self, id: usize, cost: f64) {
        self.serviced.push(id);
        self.revenue += cost;
    }

    pub(crate) fn record_unserviced(&mut self, request: Request) {
        self.unserviced.push(request);
    }
}
