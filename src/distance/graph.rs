//! Directed weighted graph of locations.

use crate::error::DarpError;

/// A directed edge with a non-negative distance.
///
/// # Examples
///
/// ```
/// use u_dialride::distance::DirectedEdge;
///
/// let e = DirectedEdge::new(1, 2, 5.0);
/// assert_eq!(e.from(), 1);
/// assert_eq!(e.to(), 2);
/// assert_eq!(e.weight(), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectedEdge {
    from: usize,
    to: usize,
    weight: f64,
}

impl DirectedEdge {
    /// Creates a new edge. Weight validity is enforced by [`Digraph::add_edge`].
    pub fn new(from: usize, to: usize, weight: f64) -> Self {
        Self { from, to, weight }
    }

    /// Tail vertex.
    pub fn from(&self) -> usize {
        self.from
    }

    /// Head vertex.
    pub fn to(&self) -> usize {
        self.to
    }

    /// Edge distance.
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// An edge-weighted digraph over `0..vertex_count` locations.
///
/// Edges are directed: distances between two locations need not be
/// symmetric, and no reverse edge is ever added implicitly.
///
/// # Examples
///
/// ```
/// use u_dialride::distance::Digraph;
///
/// let mut g = Digraph::new(3);
/// g.add_edge(0, 1, 4.0).unwrap();
/// g.add_edge(1, 2, 6.0).unwrap();
/// assert_eq!(g.edge_count(), 2);
/// assert!(g.add_edge(0, 2, -1.0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Digraph {
    vertex_count: usize,
    edge_count: usize,
    adj: Vec<Vec<DirectedEdge>>,
}

impl Digraph {
    /// Creates a graph with `vertex_count` vertices and no edges.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            edge_count: 0,
            adj: vec![Vec::new(); vertex_count],
        }
    }

    /// Adds a directed edge from `from` to `to` with the given distance.
    ///
    /// Fails with [`DarpError::InvalidWeight`] for a negative or non-finite
    /// weight, and [`DarpError::VertexOutOfRange`] for an endpoint outside
    /// the graph. Negative weights would break Dijkstra's correctness.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: f64) -> Result<(), DarpError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(DarpError::InvalidWeight { from, to, weight });
        }
        for vertex in [from, to] {
            if vertex >= self.vertex_count {
                return Err(DarpError::VertexOutOfRange {
                    vertex,
                    vertex_count: self.vertex_count,
                });
            }
        }
        self.adj[from].push(DirectedEdge::new(from, to, weight));
        self.edge_count += 1;
        Ok(())
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Edges leaving `vertex`.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is out of range.
    pub fn adjacent(&self, vertex: usize) -> &[DirectedEdge] {
        &self.adj[vertex]
    }
}
