//! Shared types for the graph engine.

use std::fmt;
use thiserror::Error;

/// Vertex id in `[0, n)`.
pub type Vertex = usize;

/// Non-negative edge weight.
pub type Weight = u64;

/// Distance between two vertices, or the explicit absence of a route.
///
/// Ordered so that every finite distance is smaller than `Unreachable`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Distance {
    Finite(Weight),
    Unreachable,
}

impl Distance {
    pub fn finite(self) -> Option<Weight> {
        match self {
            Self::Finite(w) => Some(w),
            Self::Unreachable => None,
        }
    }

    pub fn is_reachable(self) -> bool {
        matches!(self, Self::Finite(_))
    }

    /// Sum of two distances; unreachable if either side is.
    pub fn plus(self, other: Distance) -> Distance {
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => Self::Finite(a.saturating_add(b)),
            _ => Self::Unreachable,
        }
    }
}

impl From<Option<Weight>> for Distance {
    fn from(value: Option<Weight>) -> Self {
        value.map_or(Self::Unreachable, Self::Finite)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(w) => write!(f, "{}", w),
            Self::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// Errors that can occur during graph queries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Vertex {vertex} out of range (graph has {vertex_count} vertices)")]
    OutOfRange { vertex: Vertex, vertex_count: usize },
    #[error("No route from {from} to {to}")]
    Unreachable { from: Vertex, to: Vertex },
    #[error("Graph of {requested} vertices is too large")]
    TooManyVertices { requested: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_ordering() {
        assert!(Distance::Finite(0) < Distance::Finite(1));
        assert!(Distance::Finite(u64::MAX) < Distance::Unreachable);
    }

    #[test]
    fn test_distance_plus() {
        assert_eq!(
            Distance::Finite(3).plus(Distance::Finite(4)),
            Distance::Finite(7)
        );
        assert_eq!(
            Distance::Finite(3).plus(Distance::Unreachable),
            Distance::Unreachable
        );
        assert_eq!(Distance::from(None), Distance::Unreachable);
        assert_eq!(Distance::Unreachable.to_string(), "unreachable");
    }
}
