// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::io;
use std::str::from_utf8;

use quick_xml::events::{BytesStart, Event};

use super::model::{Feature, Node, Way};
use super::FeatureReader;
use crate::Coordinate;

/// Parser is a trait for objects which can parse XML.
///
/// This trait only exists to fix the mismatch of
/// [quick_xml::Reader::read_event] when working on buffered data
/// and [quick_xml::Reader::read_event_into] when working on IO.
pub(super) trait Parser {
    fn read_event(&mut self) -> quick_xml::Result<Event<'_>>;
}

/// IoParser implements [Parser] over an [std::io::BufRead].
pub(super) struct IoParser<R: io::BufRead>(quick_xml::Reader<R>, Vec<u8>);

impl<R: io::BufRead> Parser for IoParser<R> {
    #[inline]
    fn read_event(&mut self) -> quick_xml::Result<Event<'_>> {
        self.1.clear();
        self.0.read_event_into(&mut self.1)
    }
}

/// BufParser implements [Parser] over a slice of bytes (`&[u8]`).
pub(super) struct BufParser<'a>(quick_xml::Reader<&'a [u8]>);

impl<'a> Parser for BufParser<'a> {
    #[inline]
    fn read_event(&mut self) -> quick_xml::Result<Event<'_>> {
        self.0.read_event()
    }
}

/// Reader streams OSM [Features](Feature) from an
/// [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML) document.
pub(super) struct Reader<P: Parser> {
    parser: P,
    eof: bool,
}

impl<'a> Reader<BufParser<'a>> {
    #[inline]
    pub(super) fn from_buffer(data: &'a [u8]) -> Self {
        Self {
            parser: BufParser(quick_xml::Reader::from_reader(data)),
            eof: false,
        }
    }
}

impl<R: io::BufRead> Reader<IoParser<R>> {
    #[inline]
    pub(super) fn from_io(reader: R) -> Self {
        Self {
            parser: IoParser(quick_xml::Reader::from_reader(reader), Vec::default()),
            eof: false,
        }
    }
}

impl<P: Parser> FeatureReader for Reader<P> {
    type Error = quick_xml::Error;

    fn next(&mut self) -> Result<Option<Feature>, Self::Error> {
        let mut f: Option<Feature> = None;

        while !self.eof {
            match self.parser.read_event()? {
                Event::Empty(start) => match start.local_name().as_ref() {
                    b"node" => {
                        if let Some(n) = parse_node(&start) {
                            return Ok(Some(Feature::Node(n)));
                        }
                    }
                    // "way" can't be self-closing
                    b"tag" => {
                        if let Some(Feature::Way(ref mut w)) = f {
                            if let Some((k, v)) = parse_tag(&start) {
                                w.tags.insert(k, v);
                            }
                        }
                    }
                    b"nd" => {
                        if let Some(Feature::Way(ref mut w)) = f {
                            match parse_nd(&start) {
                                Some(ref_) => w.nodes.push(ref_),
                                None => log::warn!("way {}: skipping invalid <nd>", w.id),
                            }
                        }
                    }
                    _ => {}
                },

                Event::Start(start) => match start.local_name().as_ref() {
                    b"node" => f = parse_node(&start).map(Feature::Node),
                    b"way" => f = parse_way(&start).map(Feature::Way),
                    // relations are not used - their tags and members are ignored,
                    // as `f` stays empty until the next node or way
                    b"relation" => f = None,
                    _ => {}
                },

                Event::End(end) => match end.local_name().as_ref() {
                    b"node" | b"way" => {
                        if let Some(f) = f.take() {
                            return Ok(Some(f));
                        }
                    }
                    _ => {}
                },

                Event::Eof => {
                    self.eof = true;
                }

                _ => {}
            }
        }

        Ok(f)
    }
}

fn parse_node(start: &BytesStart<'_>) -> Option<Node> {
    let mut id: i64 = 0;
    let mut lat = f64::NAN;
    let mut lon = f64::NAN;

    for attr in start.attributes() {
        let attr = attr.ok()?;
        match attr.key.as_ref() {
            b"id" => id = from_utf8(&attr.value).ok()?.parse().ok()?,
            b"lat" => lat = from_utf8(&attr.value).ok()?.parse().ok()?,
            b"lon" => lon = from_utf8(&attr.value).ok()?.parse().ok()?,
            _ => {}
        }
    }

    if id != 0 && lat.is_finite() && lon.is_finite() {
        Some(Node {
            id,
            coordinate: Coordinate::new(lon, lat),
        })
    } else {
        log::warn!("skipping node {} without a valid position", id);
        None
    }
}

fn parse_way(start: &BytesStart<'_>) -> Option<Way> {
    let id = parse_i64_attribute(start, b"id")?;
    Some(Way {
        id,
        nodes: Vec::default(),
        tags: HashMap::default(),
    })
}

fn parse_tag(start: &BytesStart<'_>) -> Option<(String, String)> {
    let mut k = None;
    let mut v = None;

    for attr in start.attributes() {
        let attr = attr.ok()?;
        match attr.key.as_ref() {
            b"k" => k = from_utf8(&attr.value).ok().map(|s| s.to_string()),
            b"v" => v = from_utf8(&attr.value).ok().map(|s| s.to_string()),
            _ => {}
        }
    }

    k.map(|k| (k, v.unwrap_or_default()))
}

fn parse_nd(start: &BytesStart<'_>) -> Option<i64> {
    parse_i64_attribute(start, b"ref")
}

/// Parses a non-zero integer attribute.
fn parse_i64_attribute(start: &BytesStart<'_>, key: &[u8]) -> Option<i64> {
    let attr = start
        .attributes()
        .filter_map(|attr| attr.ok())
        .find(|attr| attr.key.as_ref() == key)?;
    match from_utf8(&attr.value).ok()?.parse::<i64>() {
        Ok(0) | Err(_) => None,
        Ok(value) => Some(value),
    }
}
