// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Shortest directed paths over geospatial graphs.
//!
//! A [Graph] holds [Vertices](Vertex) placed at geographic [Coordinates](Coordinate)
//! and directed [Edges](Edge) between them. Edge lengths are not stored - they are
//! derived from edge geometry as great-circle distances in kilometers.
//! A [RoutingService] runs Dijkstra's algorithm over a borrowed graph to find
//! routes between vertices. Graphs can be built by hand, or loaded from
//! [OpenStreetMap](https://www.openstreetmap.org/) data with the [osm] module.
//!
//! # Example
//!
//! ```
//! use waypath::{Coordinate, Graph, RoutingService};
//!
//! let mut g = Graph::new();
//! let a = g.create_vertex(Coordinate::new(0.0, 0.0), "a");
//! let b = g.create_vertex(Coordinate::new(0.0, 0.01), "b");
//! let c = g.create_vertex(Coordinate::new(0.01, 0.01), "c");
//! let ab = g.create_edge(a, b, "ab");
//! let bc = g.create_edge(b, c, "bc");
//!
//! let route = RoutingService::new(&g).find_route(a, c).expect("failed to find route");
//! assert_eq!(route, vec![ab, bc]);
//! println!("{:.3} km", g.path_length(&route));
//! ```

mod distance;
mod error;
mod graph;
pub mod osm;
pub mod routing;

pub use distance::{earth_distance, line_length};
pub use error::{Error, VertexKey};
pub use graph::{Edge, EdgeId, Graph, Vertex, VertexId};
pub use routing::RoutingService;

/// Represents a geographic position, in degrees.
///
/// Coordinates are compared by exact numeric equality of both components.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.lon, self.lat)
    }
}

impl From<[f64; 2]> for Coordinate {
    /// Converts a GeoJSON-ordered `[lon, lat]` pair.
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}
