//! Single-source shortest paths (Dijkstra).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::{log_changes, log_debug};

use super::engine::GraphEngine;
use super::types::{Distance, GraphError, Vertex, Weight};

/// Result of [`GraphEngine::shortest_paths`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShortestPaths {
    source: Vertex,
    distances: Vec<Distance>,
    predecessors: Vec<Option<Vertex>>,
}

impl ShortestPaths {
    pub fn source(&self) -> Vertex {
        self.source
    }

    /// Distance per vertex, indexed by vertex id.
    pub fn distances(&self) -> &[Distance] {
        &self.distances
    }

    pub fn distance(&self, v: Vertex) -> Result<Distance, GraphError> {
        self.distances
            .get(v)
            .copied()
            .ok_or(GraphError::OutOfRange {
                vertex: v,
                vertex_count: self.distances.len(),
            })
    }

    /// Previous hop on the shortest route to `v` (`None` for the source and
    /// for unreachable vertices).
    pub fn predecessor(&self, v: Vertex) -> Option<Vertex> {
        self.predecessors.get(v).copied().flatten()
    }

    /// Vertices from the source to `v`, inclusive.
    pub fn path_to(&self, v: Vertex) -> Result<Vec<Vertex>, GraphError> {
        if !self.distance(v)?.is_reachable() {
            return Err(GraphError::Unreachable {
                from: self.source,
                to: v,
            });
        }
        let mut path = vec![v];
        let mut current = v;
        while let Some(prev) = self.predecessor(current) {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        Ok(path)
    }
}

impl GraphEngine {
    /// Shortest distances from `source` to every vertex.
    ///
    /// Weights are non-negative by type; vertices with no route report
    /// `Distance::Unreachable`.
    pub fn shortest_paths(&self, source: Vertex) -> Result<ShortestPaths, GraphError> {
        self.check_vertex(source)?;
        let n = self.vertex_count();
        let mut distances = vec![Distance::Unreachable; n];
        let mut predecessors = vec![None; n];
        let mut queue: BinaryHeap<Reverse<(Weight, Vertex)>> = BinaryHeap::new();

        distances[source] = Distance::Finite(0);
        queue.push(Reverse((0, source)));

        while let Some(Reverse((dist_u, u))) = queue.pop() {
            // Stale entry: u was already settled with a shorter distance
            if Distance::Finite(dist_u) > distances[u] {
                continue;
            }
            for (v, w) in self.adjacent(u) {
                let candidate = dist_u.saturating_add(w);
                if Distance::Finite(candidate) < distances[v] {
                    log_debug!(self.verbosity, "Relax {} -> {}: {}", u, v, candidate);
                    distances[v] = Distance::Finite(candidate);
                    predecessors[v] = Some(u);
                    queue.push(Reverse((candidate, v)));
                }
            }
        }

        let reached = distances.iter().filter(|d| d.is_reachable()).count();
        log_changes!(
            self.verbosity,
            "Shortest paths from {}: {} of {} vertices reachable",
            source,
            reached,
            n
        );

        Ok(ShortestPaths {
            source,
            distances,
            predecessors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn delivery_graph() -> GraphEngine {
        let mut graph = GraphEngine::new(6).unwrap();
        for (u, v, w) in [
            (0, 1, 7),
            (0, 2, 9),
            (0, 5, 14),
            (1, 2, 10),
            (1, 3, 15),
            (2, 3, 11),
            (2, 5, 2),
            (3, 4, 6),
            (4, 5, 9),
        ] {
            graph.add_edge(u, v, w).unwrap();
        }
        graph
    }

    #[test]
    fn test_dijkstra_distances() {
        let graph = delivery_graph();
        let paths = graph.shortest_paths(0).unwrap();
        let expected: Vec<Distance> = [0, 7, 9, 20, 20, 11]
            .into_iter()
            .map(Distance::Finite)
            .collect();
        assert_eq!(paths.distances(), expected.as_slice());
    }

    #[test]
    fn test_path_reconstruction() {
        let graph = delivery_graph();
        let paths = graph.shortest_paths(0).unwrap();
        assert_eq!(paths.path_to(4).unwrap(), vec![0, 2, 5, 4]);
        assert_eq!(paths.path_to(3).unwrap(), vec![0, 2, 3]);
        assert_eq!(paths.path_to(0).unwrap(), vec![0]);
        assert_eq!(paths.predecessor(0), None);
    }

    #[test]
    fn test_unreachable_vertex() {
        let mut graph = GraphEngine::new(3).unwrap();
        graph.add_edge(0, 1, 4).unwrap();
        let paths = graph.shortest_paths(0).unwrap();
        assert_eq!(paths.distance(2), Ok(Distance::Unreachable));
        assert_eq!(
            paths.path_to(2),
            Err(GraphError::Unreachable { from: 0, to: 2 })
        );
        assert!(matches!(
            paths.distance(3),
            Err(GraphError::OutOfRange { vertex: 3, .. })
        ));
    }

    #[test]
    fn test_large_finite_distance_is_not_a_sentinel() {
        let mut graph = GraphEngine::new(2).unwrap();
        graph.add_edge(0, 1, 1_000_000_000).unwrap();
        let paths = graph.shortest_paths(0).unwrap();
        assert_eq!(paths.distance(1), Ok(Distance::Finite(1_000_000_000)));
    }

    #[test]
    fn test_source_out_of_range() {
        let graph = GraphEngine::new(1).unwrap();
        assert!(graph.shortest_paths(1).is_err());
    }

    proptest! {
        #[test]
        fn prop_triangle_inequality_on_every_edge(
            n in 1usize..12,
            edges in proptest::collection::vec((0usize..12, 0usize..12, 0u64..100), 0..40),
        ) {
            let mut graph = GraphEngine::new(n).unwrap();
            let edges: Vec<_> = edges.into_iter().filter(|&(u, v, _)| u < n && v < n).collect();
            for &(u, v, w) in &edges {
                graph.add_edge(u, v, w).unwrap();
            }
            let paths = graph.shortest_paths(0).unwrap();
            for u in 0..n {
                for (v, w) in graph.neighbors(u).unwrap() {
                    let via_u = paths.distances()[u].plus(Distance::Finite(w));
                    prop_assert!(paths.distances()[v] <= via_u);
                }
            }
        }
    }
}
