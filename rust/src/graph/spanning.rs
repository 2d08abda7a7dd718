//! Minimum spanning tree (Prim) grown from vertex 0.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::log_changes;

use super::engine::GraphEngine;
use super::types::{Distance, Vertex, Weight};

/// Result of [`GraphEngine::minimum_spanning_tree`].
///
/// For a disconnected graph only the component containing vertex 0 is
/// spanned; the remaining vertices are listed by [`unreached`](Self::unreached).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpanningTree {
    parents: Vec<Option<Vertex>>,
    /// Weight of the edge connecting each vertex to its parent
    keys: Vec<Distance>,
    total_weight: Weight,
    unreached: Vec<Vertex>,
}

impl SpanningTree {
    /// Parent of `v` in the tree (`None` for the root and unreached vertices).
    pub fn parent(&self, v: Vertex) -> Option<Vertex> {
        self.parents.get(v).copied().flatten()
    }

    pub fn parents(&self) -> &[Option<Vertex>] {
        &self.parents
    }

    /// Sum of the weights of all tree edges.
    pub fn total_weight(&self) -> Weight {
        self.total_weight
    }

    /// Tree edges as `(parent, child, weight)`, ordered by child.
    pub fn edges(&self) -> Vec<(Vertex, Vertex, Weight)> {
        self.parents
            .iter()
            .zip(&self.keys)
            .enumerate()
            .filter_map(|(child, (parent, key))| Some(((*parent)?, child, key.finite()?)))
            .collect()
    }

    /// Vertices the tree could not reach from vertex 0.
    pub fn unreached(&self) -> &[Vertex] {
        &self.unreached
    }

    pub fn is_spanning(&self) -> bool {
        self.unreached.is_empty()
    }
}

impl GraphEngine {
    /// Prim's algorithm from vertex 0 using a min-priority queue of candidate
    /// connecting weights.
    pub fn minimum_spanning_tree(&self) -> SpanningTree {
        let n = self.vertex_count();
        let mut parents = vec![None; n];
        let mut keys = vec![Distance::Unreachable; n];
        let mut in_tree = vec![false; n];
        let mut total_weight: Weight = 0;
        let mut queue: BinaryHeap<Reverse<(Weight, Vertex)>> = BinaryHeap::new();

        if n > 0 {
            keys[0] = Distance::Finite(0);
            queue.push(Reverse((0, 0)));
        }

        while let Some(Reverse((key_u, u))) = queue.pop() {
            if in_tree[u] {
                continue;
            }
            in_tree[u] = true;
            total_weight = total_weight.saturating_add(key_u);

            for (v, w) in self.adjacent(u) {
                if !in_tree[v] && Distance::Finite(w) < keys[v] {
                    keys[v] = Distance::Finite(w);
                    parents[v] = Some(u);
                    queue.push(Reverse((w, v)));
                }
            }
        }

        let unreached: Vec<Vertex> = (0..n).filter(|&v| !in_tree[v]).collect();
        if !unreached.is_empty() {
            tracing::warn!(
                unreached = unreached.len(),
                vertices = n,
                "Graph is disconnected, spanning tree covers only the component of vertex 0"
            );
        }
        log_changes!(
            self.verbosity,
            "Spanning tree over {} vertices, total weight {}",
            n - unreached.len(),
            total_weight
        );

        SpanningTree {
            parents,
            keys,
            total_weight,
            unreached,
        }
    }
}
