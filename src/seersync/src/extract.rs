//! Container extraction pipeline
//!
//! Ties the stages together: decompress the container, scan out named
//! segments, and for every segment that is itself a compressed object
//! stream, decode → normalize → annotate → serialize. Raw segments pass
//! through byte-for-byte. One malformed segment never blocks its siblings.

use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use flate2::read::ZlibDecoder;
use regex::Regex;

use crate::annotate::annotate;
use crate::node::Node;
use crate::normalize::{self, Registry};
use crate::xml;

/// Magic prefix of a deflate-compressed segment payload
pub const ZLIB_MAGIC: [u8; 2] = [0x78, 0xda];

/// Noise stripped from exported symbols when deriving filenames
static SYMBOL_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(_?(xmlclass|xmlcls)|com\.robot\.core\.)").expect("static pattern")
});

/// One file produced by extraction, ready for the persistence layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Container-level failure: fatal for the whole input, nothing is written
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("corrupt container: {0}")]
    Container(#[from] seersync_swf::Error),
}

/// Segment-level failure: the segment is skipped, siblings still extract
#[derive(thiserror::Error, Debug)]
pub enum SegmentError {
    #[error("failed to inflate segment payload: {0}")]
    Inflate(#[from] std::io::Error),

    #[error("malformed object stream: {0}")]
    Decode(#[from] seersync_amf::Error),

    #[error("cannot normalize records: {0}")]
    Normalize(#[from] normalize::Error),

    #[error("XML serialization failed: {0}")]
    Xml(#[from] xml::Error),
}

/// Extract every named segment of a container.
///
/// Compressed object-stream segments come back as XML documents, everything
/// else byte-for-byte. Files are returned in segment order; when two
/// segments share a name, writing in order leaves the later one on disk.
pub fn extract_container(data: &[u8], registry: &Registry) -> Result<Vec<OutputFile>, Error> {
    let body = seersync_swf::decompress(data)?;
    let segments = seersync_swf::extract_segments(&body);

    let mut files = Vec::with_capacity(segments.len());
    for segment in segments {
        let name = output_name(&segment.symbol);

        if segment.bytes.starts_with(&ZLIB_MAGIC) {
            match decode_segment(&segment.bytes, &segment.symbol, registry) {
                Ok(document) => files.push(OutputFile {
                    name,
                    bytes: document.into_bytes(),
                }),
                Err(err) => {
                    tracing::warn!(symbol = %segment.symbol, %err, "skipping malformed segment");
                }
            }
        } else {
            files.push(OutputFile {
                name,
                bytes: segment.bytes,
            });
        }
    }

    Ok(files)
}

/// Decode one object-stream segment into its XML document.
///
/// Accepts both deflate-compressed and already-inflated payloads. The
/// symbol selects the normalization handler.
pub fn decode_segment(
    bytes: &[u8],
    symbol: &str,
    registry: &Registry,
) -> Result<String, SegmentError> {
    let tree = normalize_segment(bytes, symbol, registry)?;
    Ok(xml::write_document(&annotate(tree))?)
}

/// Decode and normalize one segment without annotation or serialization
pub fn normalize_segment(
    bytes: &[u8],
    symbol: &str,
    registry: &Registry,
) -> Result<Node, SegmentError> {
    let payload;
    let stream = if bytes.starts_with(&ZLIB_MAGIC) {
        let mut decoder = ZlibDecoder::new(bytes);
        let mut inflated = Vec::new();
        decoder.read_to_end(&mut inflated)?;
        payload = inflated;
        &payload[..]
    } else {
        bytes
    };

    let value = seersync_amf::decode(stream)?;
    Ok(registry.normalize(symbol, Node::from_amf(&value))?)
}

/// Derive the destination filename for a segment symbol
pub fn output_name(symbol: &str) -> String {
    let stripped = SYMBOL_NOISE.replace_all(symbol, "");
    format!("{}.xml", stripped.trim_matches('_'))
}

/// Write extracted files into a directory, in order (last write wins on
/// name collisions)
pub fn write_outputs(files: &[OutputFile], dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    for file in files {
        std::fs::write(dir.join(&file.name), &file.bytes)?;
    }
    Ok(())
}
