// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::BinaryHeap;

use super::PathTree;
use crate::VertexId;

/// How the next vertex to visit is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    /// Scan all reached vertices on every step. O(V²) overall,
    /// without any extra memory.
    #[default]
    LinearScan,

    /// Keep reached vertices in a min-priority queue. O((V + E) log V) overall,
    /// at the cost of storing one queue entry per relaxation.
    BinaryHeap,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct QueueItem {
    at: VertexId,
    cost: f64,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // NOTE: The order is reversed, as lower costs are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap. Ties go to the lower vertex id,
        // same as in a linear scan.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.at.cmp(&self.at))
    }
}

/// Selects unvisited, reached vertices of a [PathTree] in order of increasing cost.
#[derive(Debug)]
pub(super) enum Frontier {
    LinearScan,
    BinaryHeap(BinaryHeap<QueueItem>),
}

impl Frontier {
    pub(super) fn new(strategy: SearchStrategy, tree: &PathTree<'_>) -> Self {
        match strategy {
            SearchStrategy::LinearScan => Self::LinearScan,
            SearchStrategy::BinaryHeap => {
                let mut queue = BinaryHeap::default();
                queue.push(QueueItem {
                    at: tree.origin(),
                    cost: tree.cost(tree.origin()),
                });
                Self::BinaryHeap(queue)
            }
        }
    }

    /// Records that `vertex` was relaxed to `cost`.
    pub(super) fn push(&mut self, vertex: VertexId, cost: f64) {
        if let Self::BinaryHeap(queue) = self {
            queue.push(QueueItem { at: vertex, cost });
        }
    }

    /// Returns the unvisited vertex with the lowest finite cost,
    /// or `None` if there are no such vertices.
    pub(super) fn next(&mut self, tree: &PathTree<'_>) -> Option<VertexId> {
        match self {
            Self::LinearScan => find_next_vertex(tree),
            Self::BinaryHeap(queue) => {
                while let Some(item) = queue.pop() {
                    // Queue may hold multiple items for the same vertex - skip outdated ones.
                    match tree.node(item.at) {
                        Some(node) if !node.visited && item.cost <= node.cost => {
                            return Some(item.at)
                        }
                        _ => continue,
                    }
                }
                None
            }
        }
    }
}

/// Finds the nearest reached vertex which was not visited yet.
/// On equal costs, the first vertex in enumeration order wins.
pub(super) fn find_next_vertex(tree: &PathTree<'_>) -> Option<VertexId> {
    let mut candidate: Option<(VertexId, f64)> = None;
    for (vertex, node) in tree.nodes() {
        if node.visited || !node.cost.is_finite() {
            continue;
        }
        if candidate.map_or(true, |(_, best)| node.cost < best) {
            candidate = Some((vertex, node.cost));
        }
    }
    candidate.map(|(vertex, _)| vertex)
}
