// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::{Coordinate, Graph, VertexId};

use super::{model, FeatureReader, Options};

/// A way accepted by the [Profile](crate::osm::Profile), waiting to be split into edges.
#[derive(Debug)]
struct RoutableWay {
    id: i64,
    nodes: Vec<i64>,
    forward: bool,
    backward: bool,
}

/// Helper object used for storing state related to converting [OSM features](super::model::Feature)
/// into a [Graph].
///
/// Ways are only converted once all features are read, as splitting a way at junctions
/// requires knowing all other ways using its nodes.
pub(super) struct GraphBuilder<'a> {
    g: &'a mut Graph,
    options: &'a Options<'a>,
    nodes: HashMap<i64, Coordinate>,
    ways: Vec<RoutableWay>,
    vertices: HashMap<i64, VertexId>,
    ignore_bbox: bool,
}

impl<'a> GraphBuilder<'a> {
    /// Create a new, empty graph builder.
    pub(super) fn new(g: &'a mut Graph, options: &'a Options<'a>) -> Self {
        let ignore_bbox =
            options.bbox.iter().all(|&x| x == 0.0) || options.bbox.iter().any(|x| !x.is_finite());
        if options.bbox.iter().any(|x| !x.is_finite()) {
            log::warn!("ignoring non-finite bounding box {:?}", options.bbox);
        }

        // Vertices from previous loads are joined by their OSM node ids
        let mut nodes: HashMap<i64, Coordinate> = HashMap::default();
        let mut vertices: HashMap<i64, VertexId> = HashMap::default();
        for (vertex_id, v) in g.vertices() {
            if let Ok(node_id) = v.id.parse::<i64>() {
                vertices.entry(node_id).or_insert(vertex_id);
                nodes.entry(node_id).or_insert(v.coordinate);
            }
        }

        Self {
            g,
            options,
            nodes,
            ways: Vec::default(),
            vertices,
            ignore_bbox,
        }
    }

    /// Add all features from the provided [FeatureReader], then convert
    /// collected ways into vertices and edges.
    pub(super) fn add_features<F: FeatureReader>(
        &mut self,
        mut features: F,
    ) -> Result<(), F::Error> {
        while let Some(f) = features.next()? {
            self.add_feature(f);
        }
        self.build();
        Ok(())
    }

    fn add_feature(&mut self, f: model::Feature) {
        match f {
            model::Feature::Node(n) => self.add_node(n),
            model::Feature::Way(w) => self.add_way(w),
        }
    }

    fn add_node(&mut self, n: model::Node) {
        if self.vertices.contains_key(&n.id) {
            return;
        }
        if self.is_in_bbox(n.coordinate) {
            self.nodes.insert(n.id, n.coordinate);
        }
    }

    fn is_in_bbox(&self, c: Coordinate) -> bool {
        if self.ignore_bbox {
            return true;
        }
        let [min_lon, min_lat, max_lon, max_lat] = self.options.bbox;
        c.lat >= min_lat && c.lat <= max_lat && c.lon >= min_lon && c.lon <= max_lon
    }

    fn add_way(&mut self, w: model::Way) {
        if !self.options.profile.is_routable(&w.tags) {
            return;
        }

        let nodes = self.get_way_nodes(&w);
        if nodes.len() < 2 {
            log::debug!("way {}: less than 2 known nodes, skipping", w.id);
            return;
        }

        let (forward, backward) = self.options.profile.way_direction(&w.tags);
        if !forward && !backward {
            return;
        }

        self.ways.push(RoutableWay {
            id: w.id,
            nodes,
            forward,
            backward,
        });
    }

    /// Returns references to known nodes of a way, without consecutive duplicates.
    fn get_way_nodes(&self, w: &model::Way) -> Vec<i64> {
        let mut nodes: Vec<i64> = w
            .nodes
            .iter()
            .copied()
            .filter(|node_id| self.nodes.contains_key(node_id))
            .collect();
        nodes.dedup();
        nodes
    }

    fn build(&mut self) {
        let ways = std::mem::take(&mut self.ways);
        let vertices_before = self.g.vertex_count();
        let edges_before = self.g.edge_count();

        // Nodes referenced more than once (including both ends of closed ways),
        // nodes which already are vertices and way endpoints become vertices
        let mut uses: HashMap<i64, usize> = HashMap::default();
        for way in &ways {
            for &node_id in &way.nodes {
                *uses.entry(node_id).or_default() += 1;
            }
        }
        for node_id in self.vertices.keys() {
            if let Some(n) = uses.get_mut(node_id) {
                *n += 1;
            }
        }
        let is_junction = |node_id: i64| uses.get(&node_id).is_some_and(|&n| n > 1);

        for way in &ways {
            let mut segment_start = 0;
            let mut segment_idx = 0;
            for i in 1..way.nodes.len() {
                if i == way.nodes.len() - 1 || is_junction(way.nodes[i]) {
                    self.create_edges(way, segment_idx, &way.nodes[segment_start..=i]);
                    segment_start = i;
                    segment_idx += 1;
                }
            }
        }

        log::debug!(
            "loaded {} vertices and {} edges from {} ways",
            self.g.vertex_count() - vertices_before,
            self.g.edge_count() - edges_before,
            ways.len(),
        );
    }

    fn create_edges(&mut self, way: &RoutableWay, segment_idx: usize, nodes: &[i64]) {
        debug_assert!(nodes.len() >= 2);

        let source = self.get_or_create_vertex(nodes[0]);
        let target = self.get_or_create_vertex(nodes[nodes.len() - 1]);
        let geometry: Option<Vec<Coordinate>> = if nodes.len() > 2 {
            Some(nodes.iter().map(|node_id| self.nodes[node_id]).collect())
        } else {
            None
        };

        if way.forward {
            let e = self
                .g
                .create_edge(source, target, format!("{}:{}", way.id, segment_idx));
            if let Some(ref geometry) = geometry {
                self.g.set_edge_geometry(e, geometry.clone());
            }
        }

        if way.backward {
            let e = self
                .g
                .create_edge(target, source, format!("{}:{}:rev", way.id, segment_idx));
            if let Some(mut geometry) = geometry {
                geometry.reverse();
                self.g.set_edge_geometry(e, geometry);
            }
        }
    }

    /// Returns the vertex of an OSM node, identified by the node id.
    fn get_or_create_vertex(&mut self, node_id: i64) -> VertexId {
        if let Some(&v) = self.vertices.get(&node_id) {
            return v;
        }
        let v = self
            .g
            .create_vertex(self.nodes[&node_id], node_id.to_string());
        self.vertices.insert(node_id, v);
        v
    }
}
