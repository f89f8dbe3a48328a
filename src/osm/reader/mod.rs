// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use graph_builder::GraphBuilder;

use crate::osm::Profile;
use crate::Graph;

mod graph_builder;
mod model;
mod xml;

/// Format of the input OSM file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Unknown format - guess the format based on the first bytes of the content
    Unknown,

    /// Force uncompressed [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    Xml,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    XmlGz,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    XmlBz2,
}

impl FileFormat {
    /// Guesses the format from the magic bytes at the start of a file,
    /// falling back to [FileFormat::Xml].
    pub fn detect(head: &[u8]) -> Self {
        if head.starts_with(&[0x1f, 0x8b]) {
            Self::XmlGz
        } else if head.starts_with(b"BZh") {
            Self::XmlBz2
        } else {
            Self::Xml
        }
    }
}

/// Additional controls for interpreting OSM data as a routing [Graph].
#[derive(Debug)]
pub struct Options<'a> {
    /// Which OSM ways should be converted into [Edges](crate::Edge).
    pub profile: &'a Profile<'a>,

    /// Format of the input data.
    pub file_format: FileFormat,

    /// Filter nodes by a specific bounding box. In order: left (min lon), bottom (min lat),
    /// right (max lon), top (max lat). Ignored if all values are set to zero, or at least one
    /// of them is not finite.
    pub bbox: [f64; 4],
}

/// Error conditions which may occur when loading OSM data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid OSM XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Internal trait for objects which can stream [osm features](model::Feature)
/// from an underlying source.
trait FeatureReader {
    type Error;
    fn next(&mut self) -> Result<Option<model::Feature>, Self::Error>;
}

/// Parse OSM features from a reader into a [Graph] as per the provided [Options].
///
/// The provided stream will be automatically wrapped in a buffered reader.
///
/// Features may be added to a non-empty graph. New ways are joined with existing
/// vertices whose [id](crate::Vertex::id) is the same OSM node id, and are split
/// at such vertices. Existing edges are never split - a new way connecting to
/// a node in the middle of an already loaded stretch stays disconnected from it.
pub fn add_features_from_io<R: io::Read>(
    g: &mut Graph,
    options: &Options<'_>,
    reader: R,
) -> Result<(), Error> {
    let mut b = io::BufReader::new(reader);
    let file_format = match options.file_format {
        FileFormat::Unknown => FileFormat::detect(b.fill_buf()?),
        f => f,
    };

    match file_format {
        FileFormat::Unknown | FileFormat::Xml => {
            GraphBuilder::new(g, options).add_features(xml::Reader::from_io(b))?;
        }

        FileFormat::XmlGz => {
            let d = flate2::read::MultiGzDecoder::new(b);
            let r = xml::Reader::from_io(io::BufReader::new(d));
            GraphBuilder::new(g, options).add_features(r)?;
        }

        FileFormat::XmlBz2 => {
            let d = bzip2::read::MultiBzDecoder::new(b);
            let r = xml::Reader::from_io(io::BufReader::new(d));
            GraphBuilder::new(g, options).add_features(r)?;
        }
    }

    Ok(())
}

/// Parse OSM features from a file at the provided path into a [Graph] as per the provided [Options].
pub fn add_features_from_file<P: AsRef<Path>>(
    g: &mut Graph,
    options: &Options<'_>,
    path: P,
) -> Result<(), Error> {
    let f = File::open(path)?;
    add_features_from_io(g, options, f)
}

/// Parse OSM features from a static buffer into a [Graph] as per the provided [Options].
pub fn add_features_from_buffer(
    g: &mut Graph,
    options: &Options<'_>,
    data: &[u8],
) -> Result<(), Error> {
    let file_format = match options.file_format {
        FileFormat::Unknown => FileFormat::detect(data),
        f => f,
    };

    if file_format == FileFormat::Xml {
        // Fast path is available for in-memory XML data
        GraphBuilder::new(g, options).add_features(xml::Reader::from_buffer(data))?;
        Ok(())
    } else {
        // Wrap the buffer in a cursor and use the IO path
        let cursor = io::Cursor::new(data);
        add_features_from_io(g, options, cursor)
    }
}
