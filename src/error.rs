// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::Coordinate;

/// Key of a failed [Graph](crate::Graph) vertex lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum VertexKey {
    Id(String),
    Coordinate(Coordinate),
}

impl std::fmt::Display for VertexKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id={}", id),
            Self::Coordinate(c) => write!(f, "coordinate={}", c),
        }
    }
}

/// Error conditions which may occur during [Graph](crate::Graph) lookups
/// or [route finding](crate::RoutingService::find_route).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// No vertex matches the given identifier or coordinate.
    #[error("vertex with {0} not found")]
    VertexNotFound(VertexKey),

    /// The destination is not reachable from the origin:
    /// all vertices reachable from the origin were visited.
    #[error("no route found from '{origin}' to '{destination}'")]
    RouteNotFound { origin: String, destination: String },

    /// Route search has visited more vertices than allowed by
    /// [Options::step_limit](crate::routing::Options::step_limit).
    #[error("step limit of {0} visits exceeded")]
    StepLimitExceeded(usize),
}
