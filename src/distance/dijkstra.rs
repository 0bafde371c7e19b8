//! Single-source shortest paths via Dijkstra's algorithm.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::graph::{Digraph, DirectedEdge};

/// Heap entry ordered as a min-heap on distance.
///
/// The heap uses lazy deletion: a vertex may be pushed again with a better
/// distance, and stale entries are skipped on pop.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HeapItem {
    vertex: usize,
    dist: f64,
}

impl Eq for HeapItem {}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flip distance to make BinaryHeap a min-heap; tie-break on vertex
        // for a deterministic pop order.
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

/// The shortest-path tree from one source location.
///
/// Distances are `f64::INFINITY` for vertices with no path from the source.
/// Immutable once built; share freely.
///
/// # Examples
///
/// ```
/// use u_dialride::distance::{Digraph, ShortestPaths};
///
/// let mut g = Digraph::new(3);
/// g.add_edge(0, 1, 5.0).unwrap();
/// g.add_edge(1, 2, 3.0).unwrap();
/// let sp = ShortestPaths::from_source(&g, 0);
/// assert_eq!(sp.distance_to(2), 8.0);
/// assert!(!sp.has_path_to(0) || sp.distance_to(0) == 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    source: usize,
    dist: Vec<f64>,
    edge_to: Vec<Option<DirectedEdge>>,
}

impl ShortestPaths {
    /// Runs Dijkstra's algorithm from `source` over the whole graph.
    ///
    /// # Panics
    ///
    /// Panics if `source` is out of range.
    pub fn from_source(graph: &Digraph, source: usize) -> Self {
        assert!(
            source < graph.vertex_count(),
            "source {source} out of range for {} vertices",
            graph.vertex_count()
        );

        let n = graph.vertex_count();
        let mut dist = vec![f64::INFINITY; n];
        let mut edge_to: Vec<Option<DirectedEdge>> = vec![None; n];
        let mut heap = BinaryHeap::with_capacity(n);

        dist[source] = 0.0;
        heap.push(HeapItem {
            vertex: source,
            dist: 0.0,
        });

        while let Some(HeapItem { vertex, dist: d }) = heap.pop() {
            // Stale entry: a shorter path to this vertex was settled already.
            if d > dist[vertex] {
                continue;
            }
            for edge in graph.adjacent(vertex) {
                let next = edge.to();
                let candidate = d + edge.weight();
                if candidate < dist[next] {
                    dist[next] = candidate;
                    edge_to[next] = Some(*edge);
                    heap.push(HeapItem {
                        vertex: next,
                        dist: candidate,
                    });
                }
            }
        }

        Self {
            source,
            dist,
            edge_to,
        }
    }

    /// The source this tree was built from.
    pub fn source(&self) -> usize {
        self.source
    }

    /// Shortest distance from the source to `vertex`, or `f64::INFINITY`
    /// if unreachable.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is out of range.
    pub fn distance_to(&self, vertex: usize) -> f64 {
        self.dist[vertex]
    }

    /// Returns `true` if `vertex` is reachable from the source.
    pub fn has_path_to(&self, vertex: usize) -> bool {
        self.dist[vertex].is_finite()
    }

    /// The predecessor edge of `vertex` on its shortest path, if any.
    pub fn edge_to(&self, vertex: usize) -> Option<&DirectedEdge> {
        self.edge_to[vertex].as_ref()
    }

    /// The full shortest path from the source to `vertex`, in travel order.
    ///
    /// Returns `None` if `vertex` is unreachable. The path to the source
    /// itself is the empty edge list.
    pub fn path_to(&self, vertex: usize) -> Option<Vec<DirectedEdge>> {
        if !self.has_path_to(vertex) {
            return None;
        }
        let mut path = Vec::new();
        let mut current = vertex;
        while let Some(edge) = self.edge_to[current] {
            path.push(edge);
            current = edge.from();
        }
        path.reverse();
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The textbook digraph: hand-computed tree from vertex 0.
    fn sample_graph() -> Digraph {
        let mut g = Digraph::new(6);
        g.add_edge(0, 1, 7.0).expect("valid");
        g.add_edge(0, 2, 9.0).expect("valid");
        g.add_edge(0, 5, 14.0).expect("valid");
        g.add_edge(1, 2, 10.0).expect("valid");
        g.add_edge(1, 3, 15.0).expect("valid");
        g.add_edge(2, 3, 11.0).expect("valid");
        g.add_edge(2, 5, 2.0).expect("valid");
        g.add_edge(3, 4, 6.0).expect("valid");
        g.add_edge(5, 4, 9.0).expect("valid");
        g
    }

    #[test]
    fn test_distances_match_hand_computed_tree() {
        let sp = ShortestPaths::from_source(&sample_graph(), 0);
        assert_eq!(sp.distance_to(0), 0.0);
        assert_eq!(sp.distance_to(1), 7.0);
        assert_eq!(sp.distance_to(2), 9.0);
        assert_eq!(sp.distance_to(3), 20.0);
        assert_eq!(sp.distance_to(4), 20.0);
        assert_eq!(sp.distance_to(5), 11.0);
    }

    #[test]
    fn test_unreachable_is_infinite() {
        let mut g = Digraph::new(3);
        g.add_edge(0, 1, 1.0).expect("valid");
        // vertex 2 has no incoming edge
        let sp = ShortestPaths::from_source(&g, 0);
        assert!(!sp.has_path_to(2));
        assert_eq!(sp.distance_to(2), f64::INFINITY);
        assert!(sp.path_to(2).is_none());
    }

    #[test]
    fn test_directed_only() {
        let mut g = Digraph::new(2);
        g.add_edge(0, 1, 4.0).expect("valid");
        let sp = ShortestPaths::from_source(&g, 1);
        // Edge runs 0 -> 1 only; nothing is reachable from 1.
        assert!(!sp.has_path_to(0));
        assert_eq!(sp.distance_to(1), 0.0);
    }

    #[test]
    fn test_path_reconstruction() {
        let sp = ShortestPaths::from_source(&sample_graph(), 0);
        let path = sp.path_to(4).expect("reachable");
        // 0 -> 2 -> 5 -> 4 at distance 20
        let vertices: Vec<usize> = std::iter::once(0)
            .chain(path.iter().map(|e| e.to()))
            .collect();
        assert_eq!(vertices, vec![0, 2, 5, 4]);
        let total: f64 = path.iter().map(|e| e.weight()).sum();
        assert_eq!(total, sp.distance_to(4));
    }

    #[test]
    fn test_path_to_source_is_empty() {
        let sp = ShortestPaths::from_source(&sample_graph(), 0);
        assert_eq!(sp.path_to(0).expect("trivially reachable").len(), 0);
    }

    #[test]
    fn test_shorter_path_replaces_direct_edge() {
        let mut g = Digraph::new(3);
        g.add_edge(0, 2, 10.0).expect("valid");
        g.add_edge(0, 1, 3.0).expect("valid");
        g.add_edge(1, 2, 3.0).expect("valid");
        let sp = ShortestPaths::from_source(&g, 0);
        assert_eq!(sp.distance_to(2), 6.0);
        assert_eq!(sp.edge_to(2).expect("has predecessor").from(), 1);
    }

    #[test]
    fn test_single_vertex_graph() {
        let g = Digraph::new(1);
        let sp = ShortestPaths::from_source(&g, 0);
        assert_eq!(sp.distance_to(0), 0.0);
    }
}
