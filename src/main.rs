// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use serde_json::json;
use waypath::osm;
use waypath::routing::{Options, SearchStrategy, Termination};
use waypath::{Coordinate, EdgeId, Graph, RoutingService, VertexId};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct GraphLoadError(PathBuf, #[source] osm::Error);

#[derive(Debug, thiserror::Error)]
#[error("no vertex near the {0} position - is the graph empty?")]
struct SnapError(&'static str);

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProfileArg {
    Car,
    Bicycle,
    Foot,
    Railway,
}

impl ProfileArg {
    fn profile(self) -> &'static osm::Profile<'static> {
        match self {
            Self::Car => &osm::CAR_PROFILE,
            Self::Bicycle => &osm::BICYCLE_PROFILE,
            Self::Foot => &osm::FOOT_PROFILE,
            Self::Railway => &osm::RAILWAY_PROFILE,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Unknown,
    Xml,
    XmlGz,
    XmlBz2,
}

impl From<FormatArg> for osm::FileFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Unknown => Self::Unknown,
            FormatArg::Xml => Self::Xml,
            FormatArg::XmlGz => Self::XmlGz,
            FormatArg::XmlBz2 => Self::XmlBz2,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    LinearScan,
    BinaryHeap,
}

impl From<StrategyArg> for SearchStrategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::LinearScan => Self::LinearScan,
            StrategyArg::BinaryHeap => Self::BinaryHeap,
        }
    }
}

#[derive(Parser)]
struct Cli {
    /// The path to the OSM file
    osm_file: PathBuf,

    /// Latitude of the start point
    start_lat: f64,

    /// Longitude of the start point
    start_lon: f64,

    /// Latitude of the end point
    end_lat: f64,

    /// Longitude of the end point
    end_lon: f64,

    /// Which ways are routable
    #[arg(long, value_enum, default_value = "car")]
    profile: ProfileArg,

    /// Format of the OSM file
    #[arg(long, value_enum, default_value = "unknown")]
    format: FormatArg,

    /// How the next vertex to visit is picked
    #[arg(long, value_enum, default_value = "linear-scan")]
    strategy: StrategyArg,

    /// Only stop the search after visiting the destination
    #[arg(long)]
    settled: bool,

    /// Increase logging verbosity (may be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    fn routing_options(&self) -> Options {
        Options {
            strategy: self.strategy.into(),
            termination: if self.settled {
                Termination::Settled
            } else {
                Termination::Reached
            },
            ..Options::default()
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    colog::default_builder().filter_level(cli.log_level()).init();

    let g = load_graph(&cli.osm_file, cli.profile.profile(), cli.format.into())?;
    log::info!(
        "loaded {} vertices and {} edges from {}",
        g.vertex_count(),
        g.edge_count(),
        cli.osm_file.display(),
    );

    let start = snap(&g, Coordinate::new(cli.start_lon, cli.start_lat), "start")?;
    let end = snap(&g, Coordinate::new(cli.end_lon, cli.end_lat), "end")?;

    let route = RoutingService::with_options(&g, cli.routing_options()).find_route(start, end)?;
    println!("{}", serde_json::to_string_pretty(&route_geojson(&g, &route))?);

    Ok(())
}

fn load_graph<P: AsRef<Path>>(
    path: P,
    profile: &osm::Profile<'_>,
    file_format: osm::FileFormat,
) -> Result<Graph, GraphLoadError> {
    let mut g = Graph::default();
    let options = osm::Options {
        profile,
        file_format,
        bbox: [0.0; 4],
    };
    match osm::add_features_from_file(&mut g, &options, path.as_ref()) {
        Ok(()) => Ok(g),
        Err(e) => Err(GraphLoadError(PathBuf::from(path.as_ref()), e)),
    }
}

fn snap(g: &Graph, c: Coordinate, which: &'static str) -> Result<VertexId, SnapError> {
    let v = g.find_nearest_vertex(c).ok_or(SnapError(which))?;
    log::info!("{} position {} snapped to vertex {}", which, c, g.vertex(v).id);
    Ok(v)
}

/// Builds a GeoJSON FeatureCollection with the route as its only LineString feature.
fn route_geojson(g: &Graph, route: &[EdgeId]) -> serde_json::Value {
    let edges: Vec<&str> = route.iter().map(|&e| g.edge(e).id.as_str()).collect();
    let coordinates: Vec<[f64; 2]> = g
        .path_geometry(route)
        .into_iter()
        .map(|c| [c.lon, c.lat])
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {
                "length_km": g.path_length(route),
                "edges": edges,
            },
            "geometry": {
                "type": "LineString",
                "coordinates": coordinates,
            },
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geojson_output() {
        let mut g = Graph::new();
        let a = g.create_vertex(Coordinate::new(0.0, 0.0), "a");
        let b = g.create_vertex(Coordinate::new(0.01, 0.0), "b");
        let c = g.create_vertex(Coordinate::new(0.01, 0.01), "c");
        let ab = g.create_edge(a, b, "quote \" and \u{7f}");
        let bc = g.create_edge(b, c, "bc");

        let output = serde_json::to_string_pretty(&route_geojson(&g, &[ab, bc])).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        let feature = &parsed["features"][0];

        assert_eq!(feature["properties"]["edges"][0], "quote \" and \u{7f}");
        assert_eq!(feature["properties"]["edges"][1], "bc");
        assert_eq!(
            feature["geometry"]["coordinates"],
            json!([[0.0, 0.0], [0.01, 0.0], [0.01, 0.01]]),
        );
        assert!(feature["properties"]["length_km"].as_f64().unwrap() > 2.0);
    }

    #[test]
    fn geojson_empty_route() {
        let g = Graph::new();
        let output = route_geojson(&g, &[]);
        assert_eq!(output["features"][0]["properties"]["edges"], json!([]));
        assert_eq!(output["features"][0]["geometry"]["coordinates"], json!([]));
    }
}
