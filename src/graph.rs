// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::borrow::Cow;

use crate::{earth_distance, line_length, Coordinate, Error, VertexKey};

/// Handle of a [Vertex] in the [Graph] which created it.
///
/// Handles are ordered by creation, which is the enumeration order of [Graph::vertices].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(usize);

impl VertexId {
    /// Position of the vertex in its graph's insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle of an [Edge] in the [Graph] which created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(usize);

impl EdgeId {
    /// Position of the edge in its graph's insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node of the [Graph] placed at a specific [Coordinate].
///
/// Two vertices are distinct even if they share a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// Identifier of the vertex. Expected, but not required, to be unique.
    pub id: String,
    pub coordinate: Coordinate,
}

/// A directed connection between two [Vertices](Vertex).
///
/// The length of an edge is not stored; see [Graph::edge_length].
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: String,
    source: VertexId,
    target: VertexId,
    geometry: Option<Vec<Coordinate>>,
}

impl Edge {
    pub fn source(&self) -> VertexId {
        self.source
    }

    pub fn target(&self) -> VertexId {
        self.target
    }

    /// Returns the explicitly set geometry of this edge, if any.
    /// See [Graph::edge_geometry] for the effective geometry.
    pub fn geometry(&self) -> Option<&[Coordinate]> {
        self.geometry.as_deref()
    }
}

/// Represents a network as an insertion-ordered set of [Vertices](Vertex)
/// and directed [Edges](Edge) between them.
///
/// There is no adjacency index - [Graph::out_edges] and [Graph::in_edges]
/// scan all edges on every call.
///
/// Every edge must connect vertices of the same graph. This is not checked,
/// and using handles of another graph results in wrong routes or panics.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Graph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of vertices in the graph.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Retrieves a [Vertex] by its handle.
    ///
    /// Panics if the handle was not created by this graph.
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    /// Retrieves an [Edge] by its handle.
    ///
    /// Panics if the handle was not created by this graph.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    /// Returns an iterator over all [Vertices](Vertex), in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(idx, v)| (VertexId(idx), v))
    }

    /// Returns an iterator over all [Edges](Edge), in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(idx, e)| (EdgeId(idx), e))
    }

    /// Appends a new [Vertex]. Neither the identifier nor the coordinate
    /// are checked for uniqueness.
    pub fn create_vertex(&mut self, coordinate: Coordinate, id: impl Into<String>) -> VertexId {
        self.vertices.push(Vertex {
            id: id.into(),
            coordinate,
        });
        VertexId(self.vertices.len() - 1)
    }

    /// Appends a new directed [Edge] from `source` to `target`, without explicit geometry.
    pub fn create_edge(
        &mut self,
        source: VertexId,
        target: VertexId,
        id: impl Into<String>,
    ) -> EdgeId {
        self.edges.push(Edge {
            id: id.into(),
            source,
            target,
            geometry: None,
        });
        EdgeId(self.edges.len() - 1)
    }

    /// Sets the explicit geometry of an [Edge].
    ///
    /// The geometry should start at the source and end at the target coordinate,
    /// but this is not enforced. Panics if the geometry has less than 2 points.
    pub fn set_edge_geometry(&mut self, edge: EdgeId, geometry: Vec<Coordinate>) {
        assert!(geometry.len() >= 2, "edge geometry needs at least 2 points");
        self.edges[edge.0].geometry = Some(geometry);
    }

    /// Gets all [Edges](Edge) leaving `vertex`, in insertion order.
    pub fn out_edges(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges()
            .filter(move |(_, e)| e.source == vertex)
            .map(|(id, _)| id)
    }

    /// Gets all [Edges](Edge) entering `vertex`, in insertion order.
    pub fn in_edges(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges()
            .filter(move |(_, e)| e.target == vertex)
            .map(|(id, _)| id)
    }

    /// Finds the first [Vertex] with the provided identifier.
    pub fn find_vertex_by_id(&self, id: &str) -> Result<VertexId, Error> {
        self.vertices()
            .find(|(_, v)| v.id == id)
            .map(|(vid, _)| vid)
            .ok_or_else(|| Error::VertexNotFound(VertexKey::Id(id.to_string())))
    }

    /// Finds the first [Vertex] placed exactly at the provided coordinate.
    pub fn find_vertex_by_coordinate(&self, c: Coordinate) -> Result<VertexId, Error> {
        self.vertices()
            .find(|(_, v)| v.coordinate.lon == c.lon && v.coordinate.lat == c.lat)
            .map(|(vid, _)| vid)
            .ok_or(Error::VertexNotFound(VertexKey::Coordinate(c)))
    }

    /// Returns the [Vertex] placed exactly at the provided coordinate,
    /// creating one if none exists. Created vertices are identified by
    /// the vertex count after insertion.
    pub fn get_or_create_vertex(&mut self, c: Coordinate) -> VertexId {
        match self.find_vertex_by_coordinate(c) {
            Ok(id) => id,
            Err(_) => {
                let id = (self.vertices.len() + 1).to_string();
                log::trace!("creating vertex {} at {}", id, c);
                self.create_vertex(c, id)
            }
        }
    }

    /// Finds the closest [Vertex] to the given position.
    ///
    /// This function requires computing the distance to every vertex in the graph,
    /// and is not suitable for large graphs.
    pub fn find_nearest_vertex(&self, c: Coordinate) -> Option<VertexId> {
        let mut best: Option<(VertexId, f64)> = None;
        for (id, v) in self.vertices() {
            let dist = earth_distance(c, v.coordinate);
            if best.map_or(true, |(_, best_dist)| dist < best_dist) {
                best = Some((id, dist));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Returns the effective geometry of an [Edge]: its explicit geometry, or
    /// a straight segment between its source and target.
    pub fn edge_geometry(&self, edge: EdgeId) -> Cow<'_, [Coordinate]> {
        let e = self.edge(edge);
        match e.geometry {
            Some(ref geometry) => Cow::Borrowed(geometry.as_slice()),
            None => Cow::Owned(vec![
                self.vertex(e.source).coordinate,
                self.vertex(e.target).coordinate,
            ]),
        }
    }

    /// Returns the length of an [Edge] in kilometers, computed over its
    /// [effective geometry](Graph::edge_geometry).
    pub fn edge_length(&self, edge: EdgeId) -> f64 {
        line_length(&self.edge_geometry(edge))
    }

    /// Returns the total length of a sequence of edges, in kilometers.
    pub fn path_length(&self, path: &[EdgeId]) -> f64 {
        path.iter().map(|&e| self.edge_length(e)).sum()
    }

    /// Concatenates effective geometries of a sequence of edges.
    /// The first point of every edge after the first one is skipped
    /// if it repeats the last emitted point.
    pub fn path_geometry(&self, path: &[EdgeId]) -> Vec<Coordinate> {
        let mut points: Vec<Coordinate> = Vec::new();
        for &edge in path {
            let geometry = self.edge_geometry(edge);
            let skip = match (points.last(), geometry.first()) {
                (Some(last), Some(first)) if last == first => 1,
                _ => 0,
            };
            points.extend_from_slice(&geometry[skip..]);
        }
        points
    }
}
