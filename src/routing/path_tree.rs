// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use crate::{EdgeId, Graph, VertexId};

/// Search state of a single vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathNode {
    /// Cost of the best known path from the origin, in kilometers.
    /// [f64::INFINITY] if the vertex was not reached.
    pub cost: f64,

    /// Last edge of the best known path from the origin.
    /// `None` for the origin and for unreached vertices.
    pub reaching_edge: Option<EdgeId>,

    /// Whether the out edges of the vertex were already relaxed.
    pub visited: bool,
}

impl Default for PathNode {
    fn default() -> Self {
        Self {
            cost: f64::INFINITY,
            reaching_edge: None,
            visited: false,
        }
    }
}

/// Shortest-path tree built by a single route search.
///
/// Nodes are materialized lazily: only the origin has a node after construction,
/// other vertices receive one when first relaxed. Nodes are kept ordered by
/// [VertexId], so [PathTree::reached_vertices] enumerates vertices in the same
/// order as [Graph::vertices].
#[derive(Debug, Clone)]
pub struct PathTree<'g> {
    graph: &'g Graph,
    origin: VertexId,
    nodes: BTreeMap<VertexId, PathNode>,
}

impl<'g> PathTree<'g> {
    /// Creates a tree containing only the `origin`, with zero cost.
    pub fn new(graph: &'g Graph, origin: VertexId) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            origin,
            PathNode {
                cost: 0.0,
                ..PathNode::default()
            },
        );
        Self {
            graph,
            origin,
            nodes,
        }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn origin(&self) -> VertexId {
        self.origin
    }

    /// Returns the number of vertices tracked by the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Checks if a path from the origin to `vertex` is known.
    pub fn is_reached(&self, vertex: VertexId) -> bool {
        self.nodes
            .get(&vertex)
            .is_some_and(|node| node.cost.is_finite())
    }

    pub fn node(&self, vertex: VertexId) -> Option<&PathNode> {
        self.nodes.get(&vertex)
    }

    /// Returns the node of a `vertex`, registering a default (unreached) one if missing.
    pub fn get_or_create_node(&mut self, vertex: VertexId) -> &mut PathNode {
        self.nodes.entry(vertex).or_default()
    }

    /// Returns the best known cost to reach `vertex`, or [f64::INFINITY].
    pub fn cost(&self, vertex: VertexId) -> f64 {
        self.nodes
            .get(&vertex)
            .map_or(f64::INFINITY, |node| node.cost)
    }

    /// Returns all vertices tracked by the tree, ordered by [VertexId].
    pub fn reached_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.nodes.keys().copied()
    }

    /// Returns all tracked vertices with their nodes, ordered by [VertexId].
    pub fn nodes(&self) -> impl Iterator<Item = (VertexId, &PathNode)> {
        self.nodes.iter().map(|(&v, node)| (v, node))
    }

    /// Builds the route from the origin to `destination` by following reaching edges.
    ///
    /// Returns an empty vector if `destination` is the origin, or if it was never reached -
    /// callers must check [PathTree::is_reached] to tell those apart.
    pub fn path(&self, destination: VertexId) -> Vec<EdgeId> {
        let mut edges = Vec::new();
        let mut current = self.node(destination).and_then(|n| n.reaching_edge);

        while let Some(edge) = current {
            edges.push(edge);
            let source = self.graph.edge(edge).source();
            current = self.node(source).and_then(|n| n.reaching_edge);
        }

        edges.reverse();
        edges
    }
}
