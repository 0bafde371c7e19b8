//! Cached shortest-path distance queries.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::dijkstra::ShortestPaths;
use super::graph::Digraph;

/// A shortest-path distance oracle over a city graph.
///
/// Shortest-path trees are built lazily on the first query for a source
/// location and cached thereafter; many stops share source locations, so
/// recomputing per query would repeat the same Dijkstra runs. The oracle is
/// read-only after construction and safe to share across threads.
///
/// # Examples
///
/// ```
/// use u_dialride::distance::{Digraph, DistanceOracle};
///
/// let mut g = Digraph::new(3);
/// g.add_edge(0, 1, 5.0).unwrap();
/// g.add_edge(1, 2, 3.0).unwrap();
/// let oracle = DistanceOracle::new(g);
/// assert_eq!(oracle.distance(0, 2), 8.0);
/// assert_eq!(oracle.distance(2, 0), f64::INFINITY);
/// ```
#[derive(Debug)]
pub struct DistanceOracle {
    graph: Digraph,
    cache: RwLock<HashMap<usize, Arc<ShortestPaths>>>,
}

impl DistanceOracle {
    /// Takes ownership of the graph; all later queries go through the cache.
    pub fn new(graph: Digraph) -> Self {
        Self {
            graph,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The underlying graph.
    pub fn graph(&self) -> &Digraph {
        &self.graph
    }

    /// The shortest-path tree rooted at `source`, building it on first use.
    ///
    /// # Panics
    ///
    /// Panics if `source` is out of range, or if the cache lock is poisoned
    /// (only possible after a panic on another thread).
    pub fn paths_from(&self, source: usize) -> Arc<ShortestPaths> {
        if let Some(paths) = self.cache.read().expect("cache lock").get(&source) {
            return Arc::clone(paths);
        }
        let paths = Arc::new(ShortestPaths::from_source(&self.graph, source));
        let mut cache = self.cache.write().expect("cache lock");
        // Another thread may have filled the entry in the meantime; keep
        // whichever tree is already cached so callers always see one value.
        Arc::clone(cache.entry(source).or_insert(paths))
    }

    /// Shortest distance from `from` to `to`, `f64::INFINITY` if unreachable.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.paths_from(from).distance_to(to)
    }

    /// Returns `true` if `to` is reachable from `from`.
    pub fn is_reachable(&self, from: usize, to: usize) -> bool {
        self.distance(from, to).is_finite()
    }
}
