//! Nearest-neighbour delivery tour.

use crate::log_changes;

use super::engine::GraphEngine;
use super::types::{Distance, GraphError, Vertex};

/// One hop of a tour, using the direct edge between `from` and `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Leg {
    pub from: Vertex,
    pub to: Vertex,
    pub distance: Distance,
}

/// Result of [`GraphEngine::approximate_tour`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tour {
    route: Vec<Vertex>,
    legs: Vec<Leg>,
}

impl Tour {
    /// Start vertex, every other vertex once, then the start again.
    pub fn route(&self) -> &[Vertex] {
        &self.route
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Total length, or `Unreachable` when any leg has no direct edge.
    pub fn total(&self) -> Distance {
        self.legs
            .iter()
            .fold(Distance::Finite(0), |acc, leg| acc.plus(leg.distance))
    }

    /// Legs with no direct edge between their endpoints.
    pub fn unreachable_legs(&self) -> impl Iterator<Item = &Leg> + '_ {
        self.legs.iter().filter(|leg| !leg.distance.is_reachable())
    }

    /// Whether every leg, including the return to start, has a direct edge.
    pub fn is_complete(&self) -> bool {
        self.legs.iter().all(|leg| leg.distance.is_reachable())
    }
}

impl GraphEngine {
    /// Greedy tour from `start`: always move to the nearest unvisited vertex by
    /// direct edge weight, then return to `start`.
    ///
    /// Ties go to the lowest vertex id. When no unvisited vertex is adjacent,
    /// the lowest unvisited id is taken and that leg is reported unreachable.
    pub fn approximate_tour(&self, start: Vertex) -> Result<Tour, GraphError> {
        self.check_vertex(start)?;
        let n = self.vertex_count();
        let mut visited = vec![false; n];
        let mut route = Vec::with_capacity(n + 1);
        let mut legs = Vec::with_capacity(n);

        visited[start] = true;
        route.push(start);
        let mut current = start;

        for _ in 1..n {
            let nearest = (0..n)
                .filter(|&v| !visited[v])
                .filter_map(|v| self.weight_unchecked(current, v).finite().map(|w| (w, v)))
                .min();
            let (next, distance) = match nearest {
                Some((w, v)) => (v, Distance::Finite(w)),
                None => match (0..n).find(|&v| !visited[v]) {
                    Some(v) => (v, Distance::Unreachable),
                    None => break,
                },
            };
            legs.push(Leg {
                from: current,
                to: next,
                distance,
            });
            visited[next] = true;
            route.push(next);
            current = next;
        }

        legs.push(Leg {
            from: current,
            to: start,
            distance: self.weight_unchecked(current, start),
        });
        route.push(start);

        let tour = Tour { route, legs };
        log_changes!(
            self.verbosity,
            "Tour from {} computed: {} stops, total {}",
            start,
            n,
            tour.total()
        );
        if !tour.is_complete() {
            tracing::warn!(
                start,
                missing_legs = tour.unreachable_legs().count(),
                "Tour uses legs with no direct edge"
            );
        }
        Ok(tour)
    }
}
