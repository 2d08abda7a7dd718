//! Weighted undirected graph for delivery planning.
//!
//! The engine stores edges in a dense weight matrix mirrored by adjacency
//! lists and answers traversal, shortest-path, spanning-tree and touring
//! queries. Missing routes are always reported as `Distance::Unreachable`,
//! never as a large number.

mod engine;
mod paths;
mod spanning;
mod tour;
mod traversal;
mod types;

pub use engine::GraphEngine;
pub use paths::ShortestPaths;
pub use spanning::SpanningTree;
pub use tour::{Leg, Tour};
pub use traversal::{Bfs, Dfs};
pub use types::{Distance, GraphError, Vertex, Weight};
