// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Loading [Graphs](crate::Graph) from [OpenStreetMap](https://www.openstreetmap.org/) data.
//!
//! Every routable OSM way is split at junctions - nodes shared with other ways -
//! and each resulting stretch becomes a single [Edge](crate::Edge) (or a pair of
//! edges for two-way streets). Stretches over more than 2 nodes keep their shape
//! as explicit edge geometry. Only junctions and way endpoints become vertices,
//! identified by their OSM node ids.

mod profile;
mod reader;

pub use profile::{
    Profile, Tag, BICYCLE_PROFILE, CAR_PROFILE, FOOT_PROFILE, RAILWAY_PROFILE,
};
pub use reader::{
    add_features_from_buffer, add_features_from_file, add_features_from_io, Error, FileFormat,
    Options,
};
