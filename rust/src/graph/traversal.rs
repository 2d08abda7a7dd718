//! Lazy breadth-first and depth-first walks.

use std::collections::VecDeque;

use super::engine::GraphEngine;
use super::types::{GraphError, Vertex};

impl GraphEngine {
    /// Breadth-first order from `start`, reachable vertices only.
    pub fn bfs(&self, start: Vertex) -> Result<Bfs<'_>, GraphError> {
        self.check_vertex(start)?;
        let mut visited = vec![false; self.vertex_count()];
        visited[start] = true;
        Ok(Bfs {
            graph: self,
            queue: VecDeque::from([start]),
            visited,
        })
    }

    /// Depth-first order from `start`, following each adjacency list newest
    /// edge first exactly as a recursive visit would.
    pub fn dfs(&self, start: Vertex) -> Result<Dfs<'_>, GraphError> {
        self.check_vertex(start)?;
        Ok(Dfs {
            graph: self,
            start: Some(start),
            stack: Vec::new(),
            visited: vec![false; self.vertex_count()],
        })
    }
}

/// Iterator returned by [`GraphEngine::bfs`].
#[derive(Clone, Debug)]
pub struct Bfs<'a> {
    graph: &'a GraphEngine,
    queue: VecDeque<Vertex>,
    /// Marked on enqueue so no vertex is queued twice
    visited: Vec<bool>,
}

impl Iterator for Bfs<'_> {
    type Item = Vertex;

    fn next(&mut self) -> Option<Vertex> {
        let u = self.queue.pop_front()?;
        for (v, _) in self.graph.adjacent(u) {
            if !self.visited[v] {
                self.visited[v] = true;
                self.queue.push_back(v);
            }
        }
        Some(u)
    }
}

/// Iterator returned by [`GraphEngine::dfs`].
#[derive(Clone, Debug)]
pub struct Dfs<'a> {
    graph: &'a GraphEngine,
    start: Option<Vertex>,
    /// (vertex, next adjacency position to examine)
    stack: Vec<(Vertex, usize)>,
    visited: Vec<bool>,
}

impl Iterator for Dfs<'_> {
    type Item = Vertex;

    fn next(&mut self) -> Option<Vertex> {
        if let Some(start) = self.start.take() {
            self.visited[start] = true;
            self.stack.push((start, 0));
            return Some(start);
        }

        loop {
            let (u, pos) = {
                let frame = self.stack.last_mut()?;
                let current = *frame;
                frame.1 += 1;
                current
            };
            match self.graph.neighbor_at(u, pos) {
                Some(v) if !self.visited[v] => {
                    self.visited[v] = true;
                    self.stack.push((v, 0));
                    return Some(v);
                }
                Some(_) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_bfs_order() {
        let graph = delivery_graph();
        // adj(0) newest first: 5, 2, 1
        let order: Vec<Vertex> = graph.bfs(0).unwrap().collect();
        assert_eq!(order, vec![0, 5, 2, 1, 4, 3]);
    }

    #[test]
    fn test_dfs_order() {
        let graph = delivery_graph();
        // 0 -> 5 (adj 4,2,0) -> 4 (adj 5,3) -> 3 (adj 4,2,1) -> 2 (adj 5,3,1,0) -> 1
        let order: Vec<Vertex> = graph.dfs(0).unwrap().collect();
        assert_eq!(order, vec![0, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_traversals_skip_unreachable() {
        let mut graph = GraphEngine::new(4).unwrap();
        graph.add_edge(0, 1, 1).unwrap();
        graph.add_edge(2, 3, 1).unwrap();
        assert_eq!(graph.bfs(0).unwrap().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(graph.dfs(3).unwrap().collect::<Vec<_>>(), vec![3, 2]);
    }

    #[test]
    fn test_traversals_are_lazy() {
        let graph = delivery_graph();
        let mut walk = graph.dfs(0).unwrap();
        assert_eq!(walk.next(), Some(0));
        assert_eq!(walk.next(), Some(5));
        // Restarting yields a fresh walk
        assert_eq!(graph.dfs(0).unwrap().count(), 6);
    }

    #[test]
    fn test_traversal_start_out_of_range() {
        let graph = GraphEngine::new(2).unwrap();
        assert!(matches!(
            graph.bfs(2),
            Err(GraphError::OutOfRange { vertex: 2, .. })
        ));
        assert!(graph.dfs(7).is_err());
    }
}
