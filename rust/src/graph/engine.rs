//! Graph storage: a dense weight matrix plus per-vertex adjacency lists.

use crate::config::CoreConfig;
use crate::log_changes;

use super::types::{Distance, GraphError, Vertex, Weight};

/// Weighted undirected graph over vertices `0..n`.
///
/// The matrix is the single source of edge weights. Adjacency lists only
/// record neighbours, newest edge first, so the two views cannot disagree.
#[derive(Clone, Debug, Default)]
pub struct GraphEngine {
    vertex_count: usize,
    /// Row-major `vertex_count * vertex_count` weights
    weights: Vec<Distance>,
    /// Neighbours in insertion order; iterated in reverse
    adjacency: Vec<Vec<Vertex>>,
    pub(super) verbosity: u8,
}

impl GraphEngine {
    /// Create a graph with `n` vertices and no edges.
    pub fn new(n: usize) -> Result<Self, GraphError> {
        Self::with_verbosity(n, 0)
    }

    pub fn with_verbosity(n: usize, verbosity: u8) -> Result<Self, GraphError> {
        let mut graph = Self {
            verbosity,
            ..Self::default()
        };
        graph.init(n)?;
        Ok(graph)
    }

    pub fn with_config(n: usize, config: &CoreConfig) -> Result<Self, GraphError> {
        Self::with_verbosity(n, config.verbosity)
    }

    /// Reset to `n` isolated vertices, discarding every edge.
    ///
    /// Fails with `TooManyVertices` when the `n * n` weight matrix cannot be
    /// indexed; the graph is left unchanged in that case.
    pub fn init(&mut self, n: usize) -> Result<(), GraphError> {
        let cells = n
            .checked_mul(n)
            .ok_or(GraphError::TooManyVertices { requested: n })?;
        self.vertex_count = n;
        self.weights = vec![Distance::Unreachable; cells];
        for v in 0..n {
            self.weights[v * n + v] = Distance::Finite(0);
        }
        self.adjacency = vec![Vec::new(); n];
        log_changes!(self.verbosity, "Graph reset to {} vertices", n);
        Ok(())
    }

    /// Add the undirected edge `u - v` with weight `w`.
    ///
    /// A repeated edge overwrites the stored weight and is listed again in both
    /// adjacency lists. A self-loop leaves the zero diagonal untouched.
    pub fn add_edge(&mut self, u: Vertex, v: Vertex, w: Weight) -> Result<(), GraphError> {
        self.check_vertex(u)?;
        self.check_vertex(v)?;
        if u == v {
            return Ok(());
        }
        let n = self.vertex_count;
        self.weights[u * n + v] = Distance::Finite(w);
        self.weights[v * n + u] = Distance::Finite(w);
        self.adjacency[u].push(v);
        self.adjacency[v].push(u);
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of distinct undirected vertex pairs joined by an edge.
    pub fn edge_count(&self) -> usize {
        let n = self.vertex_count;
        (0..n)
            .flat_map(|u| (u + 1..n).map(move |v| (u, v)))
            .filter(|&(u, v)| self.weights[u * n + v].is_reachable())
            .count()
    }

    /// Direct edge weight between `u` and `v` (0 on the diagonal).
    pub fn weight(&self, u: Vertex, v: Vertex) -> Result<Distance, GraphError> {
        self.check_vertex(u)?;
        self.check_vertex(v)?;
        Ok(self.weight_unchecked(u, v))
    }

    /// Neighbours of `u` with their weights, most recently added edge first.
    pub fn neighbors(
        &self,
        u: Vertex,
    ) -> Result<impl Iterator<Item = (Vertex, Weight)> + '_, GraphError> {
        self.check_vertex(u)?;
        Ok(self.adjacent(u))
    }

    pub(super) fn check_vertex(&self, vertex: Vertex) -> Result<(), GraphError> {
        if vertex < self.vertex_count {
            Ok(())
        } else {
            Err(GraphError::OutOfRange {
                vertex,
                vertex_count: self.vertex_count,
            })
        }
    }

    pub(super) fn weight_unchecked(&self, u: Vertex, v: Vertex) -> Distance {
        self.weights[u * self.vertex_count + v]
    }

    pub(super) fn adjacent(&self, u: Vertex) -> impl Iterator<Item = (Vertex, Weight)> + '_ {
        self.adjacency[u]
            .iter()
            .rev()
            .filter_map(move |&v| self.weight_unchecked(u, v).finite().map(|w| (v, w)))
    }

    /// The `pos`-th neighbour of `u` in list order.
    pub(super) fn neighbor_at(&self, u: Vertex, pos: usize) -> Option<Vertex> {
        let list = &self.adjacency[u];
        if pos < list.len() {
            Some(list[list.len() - 1 - pos])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_sets_diagonal_only() {
        let graph = GraphEngine::new(3).unwrap();
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.weight(1, 1), Ok(Distance::Finite(0)));
        assert_eq!(graph.weight(0, 2), Ok(Distance::Unreachable));
    }

    #[test]
    fn test_add_edge_is_symmetric() {
        let mut graph = GraphEngine::new(3).unwrap();
        graph.add_edge(0, 2, 5).unwrap();
        assert_eq!(graph.weight(0, 2), Ok(Distance::Finite(5)));
        assert_eq!(graph.weight(2, 0), Ok(Distance::Finite(5)));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_neighbors_newest_first() {
        let mut graph = GraphEngine::new(4).unwrap();
        graph.add_edge(0, 1, 1).unwrap();
        graph.add_edge(0, 2, 2).unwrap();
        graph.add_edge(0, 3, 3).unwrap();
        let order: Vec<(Vertex, Weight)> = graph.neighbors(0).unwrap().collect();
        assert_eq!(order, vec![(3, 3), (2, 2), (1, 1)]);
    }

    #[test]
    fn test_duplicate_edge_overwrites_weight() {
        let mut graph = GraphEngine::new(2).unwrap();
        graph.add_edge(0, 1, 10).unwrap();
        graph.add_edge(1, 0, 4).unwrap();
        assert_eq!(graph.weight(0, 1), Ok(Distance::Finite(4)));
        // Both entries stay listed, each reporting the current weight
        let listed: Vec<(Vertex, Weight)> = graph.neighbors(0).unwrap().collect();
        assert_eq!(listed, vec![(1, 4), (1, 4)]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_self_loop_keeps_zero_diagonal() {
        let mut graph = GraphEngine::new(2).unwrap();
        graph.add_edge(1, 1, 9).unwrap();
        assert_eq!(graph.weight(1, 1), Ok(Distance::Finite(0)));
        assert_eq!(graph.neighbors(1).unwrap().count(), 0);
    }

    #[test]
    fn test_out_of_range() {
        let mut graph = GraphEngine::new(2).unwrap();
        assert_eq!(
            graph.add_edge(0, 2, 1),
            Err(GraphError::OutOfRange {
                vertex: 2,
                vertex_count: 2
            })
        );
        assert!(graph.weight(5, 0).is_err());
        assert!(graph.neighbors(2).is_err());
    }

    #[test]
    fn test_reinit_discards_edges() {
        let mut graph = GraphEngine::new(2).unwrap();
        graph.add_edge(0, 1, 1).unwrap();
        graph.init(4).unwrap();
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.neighbors(0).unwrap().count(), 0);
    }

    #[test]
    fn test_init_rejects_overflowing_matrix() {
        let mut graph = GraphEngine::new(2).unwrap();
        graph.add_edge(0, 1, 3).unwrap();
        let huge = usize::MAX / 2;
        assert_eq!(
            graph.init(huge),
            Err(GraphError::TooManyVertices { requested: huge })
        );
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.weight(0, 1), Ok(Distance::Finite(3)));
        assert!(GraphEngine::new(huge).is_err());
    }

    #[test]
    fn test_with_config_takes_verbosity() {
        let config = CoreConfig {
            verbosity: 2,
            ..CoreConfig::default()
        };
        let graph = GraphEngine::with_config(3, &config).unwrap();
        assert_eq!(graph.verbosity, 2);
        assert_eq!(graph.vertex_count(), 3);
    }
}
