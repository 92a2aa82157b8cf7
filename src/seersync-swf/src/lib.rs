//! Packed container parsing for game configuration assets
//!
//! Configuration bundles are distributed as a compressed container holding a
//! flat sequence of type-tagged records. Named binary segments are embedded
//! in a subset of those records.
//!
//! # Format Overview
//!
//! ## Container (`CWS` / `FWS`)
//!
//! - Bytes 0-2: Signature (`CWS` = deflate body, `FWS` = stored body)
//! - Bytes 3-6: Declared decompressed length (little-endian, advisory)
//! - Bytes 7+: Body
//!
//! ## Tagged records
//!
//! The decompressed body is a sequence of records, each starting with a
//! 16-bit little-endian header: the upper 10 bits are the tag code, the
//! lower 6 bits the payload length. A length field of 0x3f means a 32-bit
//! little-endian extended length follows. Tag code 0 ends the stream.
//!
//! Binary segments are spread over two record kinds: data records (tag 87)
//! carry `character id + payload`, symbol records (tag 76) map character
//! ids to exported names. [`extract_segments`] joins the two.

mod container;
mod segments;
mod tags;

pub use container::{decompress, Header};
pub use segments::{extract_segments, Segment};
pub use tags::{Tag, TagReader};

/// Container signature for a deflate-compressed body
pub const SIG_DEFLATE: [u8; 3] = *b"CWS";

/// Container signature for a stored (uncompressed) body
pub const SIG_STORED: [u8; 3] = *b"FWS";

/// Container header size in bytes (signature + declared length)
pub const HEADER_SIZE: usize = 7;

/// Tag code marking the end of the record stream
pub const TAG_END: u16 = 0;

/// Tag code for symbol records (character id → exported name)
pub const TAG_SYMBOL_CLASS: u16 = 76;

/// Tag code for embedded binary data records
pub const TAG_BINARY_DATA: u16 = 87;

/// Errors from container parsing
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("container too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },

    #[error("unknown container signature: {0:02x} {1:02x} {2:02x}")]
    UnknownSignature(u8, u8, u8),

    #[error("failed to inflate container body: {0}")]
    Inflate(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Check if data starts with a known container signature
pub fn is_container(data: &[u8]) -> bool {
    data.len() >= 3 && (data[0..3] == SIG_DEFLATE || data[0..3] == SIG_STORED)
}
