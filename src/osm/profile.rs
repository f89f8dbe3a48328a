// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

/// Describes which OSM ways become edges of a [Graph](crate::Graph),
/// and in which directions they can be traversed.
///
/// Edge lengths are always geodesic - a profile only decides whether a way
/// is used at all, never how much it costs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile<'a> {
    /// Human readable name of the routing profile,
    /// customary the most specific [access tag](https://wiki.openstreetmap.org/wiki/Key:access).
    ///
    /// When set to "foot", generic `oneway` tags are ignored, except on
    /// `highway=footway|path|steps|platform`, `public_transport=platform` and `railway=platform`,
    /// and no ways are one-way by default.
    pub name: &'a str,

    /// Ways with any of these tags (exact key and value match) are used for routing.
    pub ways: &'a [Tag<'a>],

    /// OSM [access tags](https://wiki.openstreetmap.org/wiki/Key:access#Land-based_transportation)
    /// (in order from least to most specific) to consider when checking for road prohibitions
    /// and mode-specific `oneway:MODE` tags.
    pub access: &'a [&'a str],

    /// Force no routing over [motorroad=yes](https://wiki.openstreetmap.org/wiki/Key:motorroad) ways.
    pub disallow_motorroad: bool,
}

/// A key-value pair of an OSM feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

impl<'a> Profile<'a> {
    /// Checks if a way with given tags matches any of [Profile::ways]
    /// and is [allowed](Profile::is_allowed).
    pub fn is_routable(&self, tags: &HashMap<String, String>) -> bool {
        let matches = self
            .ways
            .iter()
            .any(|t| tags.get(t.key).map(|v| v.as_str()) == Some(t.value));
        matches && self.is_allowed(tags)
    }

    /// Checks if a way is not prohibited, by considering motor roads ([Profile::disallow_motorroad])
    /// and the most specific present access tag ([Profile::access]).
    pub fn is_allowed(&self, tags: &HashMap<String, String>) -> bool {
        if self.disallow_motorroad && tags.get("motorroad").map(|v| v.as_str()) == Some("yes") {
            return false;
        }

        !matches!(
            self.access
                .iter()
                .rev()
                .find_map(|&mode| tags.get(mode).map(|v| v.as_str())),
            Some("no") | Some("private")
        )
    }

    /// Checks if a way is traversable forward (first return value) and
    /// backwards (second return value).
    ///
    /// `highway=motorway`, `highway=motorway_link`, `junction=roundabout` and
    /// `junction=circular` ways are one-way unless tagged otherwise.
    pub fn way_direction(&self, tags: &HashMap<String, String>) -> (bool, bool) {
        let implicit_oneway = !self.is_foot()
            && (matches!(
                tags.get("highway").map(|v| v.as_str()),
                Some("motorway") | Some("motorway_link")
            ) || matches!(
                tags.get("junction").map(|v| v.as_str()),
                Some("roundabout") | Some("circular")
            ));

        match self.active_oneway_value(tags) {
            "yes" | "true" | "1" => (true, false),
            "-1" | "reverse" => (false, true),
            "no" => (true, true),
            _ => (true, !implicit_oneway),
        }
    }

    /// Returns the value of the most specific "oneway:MODE" tag (based on [Profile::access]),
    /// falling back to "oneway", or an empty string if there are no such tags.
    fn active_oneway_value<'t>(&self, tags: &'t HashMap<String, String>) -> &'t str {
        if self.is_foot() {
            return tags
                .get("oneway:foot")
                .or_else(|| {
                    if Self::is_pedestrian_way(tags) {
                        tags.get("oneway")
                    } else {
                        None
                    }
                })
                .map_or("", |v| v.as_str());
        }

        self.access
            .iter()
            .rev()
            .filter(|&&mode| mode != "access")
            .find_map(|&mode| tags.get(&format!("oneway:{}", mode)))
            .or_else(|| tags.get("oneway"))
            .map_or("", |v| v.as_str())
    }

    /// Ways on which the generic "oneway" tag applies to pedestrians.
    fn is_pedestrian_way(tags: &HashMap<String, String>) -> bool {
        matches!(
            tags.get("highway").map(|v| v.as_str()),
            Some("footway") | Some("path") | Some("steps") | Some("platform")
        ) || tags.get("public_transport").map(|v| v.as_str()) == Some("platform")
            || tags.get("railway").map(|v| v.as_str()) == Some("platform")
    }

    fn is_foot(&self) -> bool {
        self.name == "foot"
    }
}

macro_rules! tag_list {
    ($( $key:ident = $value:literal ),+ $(,)?) => {
        &[ $( Tag { key: stringify!($key), value: $value } ),+ ]
    };
}

/// Example routing [Profile] for cars.
pub const CAR_PROFILE: Profile = Profile {
    name: "motorcar",
    ways: tag_list![
        highway = "motorway",
        highway = "motorway_link",
        highway = "trunk",
        highway = "trunk_link",
        highway = "primary",
        highway = "primary_link",
        highway = "secondary",
        highway = "secondary_link",
        highway = "tertiary",
        highway = "tertiary_link",
        highway = "unclassified",
        highway = "minor",
        highway = "residential",
        highway = "living_street",
        highway = "service",
    ],
    access: &["access", "vehicle", "motor_vehicle", "motorcar"],
    disallow_motorroad: false,
};

/// Example routing [Profile] for bicycles.
pub const BICYCLE_PROFILE: Profile = Profile {
    name: "bicycle",
    ways: tag_list![
        highway = "trunk",
        highway = "trunk_link",
        highway = "primary",
        highway = "primary_link",
        highway = "secondary",
        highway = "secondary_link",
        highway = "tertiary",
        highway = "tertiary_link",
        highway = "unclassified",
        highway = "minor",
        highway = "cycleway",
        highway = "residential",
        highway = "living_street",
        highway = "track",
        highway = "service",
        highway = "bridleway",
        highway = "footway",
        highway = "steps",
        highway = "path",
    ],
    access: &["access", "vehicle", "bicycle"],
    disallow_motorroad: true,
};

/// Example routing [Profile] for walking.
pub const FOOT_PROFILE: Profile = Profile {
    name: "foot",
    ways: tag_list![
        highway = "trunk",
        highway = "trunk_link",
        highway = "primary",
        highway = "primary_link",
        highway = "secondary",
        highway = "secondary_link",
        highway = "tertiary",
        highway = "tertiary_link",
        highway = "unclassified",
        highway = "minor",
        highway = "residential",
        highway = "living_street",
        highway = "track",
        highway = "service",
        highway = "bridleway",
        highway = "footway",
        highway = "path",
        highway = "steps",
        highway = "pedestrian",
        highway = "platform",
        railway = "platform",
        public_transport = "platform",
    ],
    access: &["access", "foot"],
    disallow_motorroad: true,
};

/// Example routing [Profile] for trains.
pub const RAILWAY_PROFILE: Profile = Profile {
    name: "train",
    ways: tag_list![
        railway = "rail",
        railway = "light_rail",
        railway = "subway",
        railway = "narrow_gauge",
    ],
    access: &["access", "train"],
    disallow_motorroad: false,
};
