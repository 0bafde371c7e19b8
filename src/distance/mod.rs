//! City graph and shortest-path distance oracle.
//!
//! Locations are opaque vertices of an edge-weighted digraph. All travel
//! times downstream derive from Dijkstra shortest-path distances, served
//! through a per-source cache.

mod dijkstra;
mod graph;
mod oracle;

pub use dijkstra::ShortestPaths;
pub use graph::{Digraph, DirectedEdge};
pub use oracle::DistanceOracle;
