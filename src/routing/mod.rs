// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Route search over a [Graph](crate::Graph).

mod path_tree;
mod queue;
mod service;

pub use path_tree::{PathNode, PathTree};
pub use queue::SearchStrategy;
pub use service::{Options, RoutingService, Termination};
