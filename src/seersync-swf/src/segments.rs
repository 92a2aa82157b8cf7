//! Named binary segment extraction
//!
//! Data records (tag 87) carry `u16 character id + u32 reserved + payload`.
//! Symbol records (tag 76) carry `u16 count` followed by `(u16 id,
//! NUL-terminated name)` entries. A segment exists once both halves are
//! present for a character id.

use std::collections::{HashMap, HashSet};

use byteorder::{ByteOrder, LittleEndian};

use crate::tags::TagReader;
use crate::{TAG_BINARY_DATA, TAG_SYMBOL_CLASS};

/// A named binary asset extracted from the record stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Exported symbol, used downstream as the destination filename
    pub symbol: String,
    pub bytes: Vec<u8>,
}

/// Extract all named binary segments from a decompressed record stream.
///
/// Segments are yielded in data-record definition order. Data records with
/// no symbol mapping are dropped. Two records mapping to the same symbol are
/// both yielded; callers keyed by filename end up with the later one
/// (last-write-wins).
pub fn extract_segments(body: &[u8]) -> Vec<Segment> {
    let mut blocks: Vec<(u16, Vec<u8>)> = Vec::new();
    let mut names: HashMap<u16, String> = HashMap::new();

    for tag in TagReader::new(body) {
        match tag.code {
            TAG_BINARY_DATA => {
                if let Some((id, data)) = parse_data_record(tag.payload) {
                    blocks.push((id, data.to_vec()));
                }
            }
            TAG_SYMBOL_CLASS => {
                // A later symbol record overrides an earlier mapping
                for (id, name) in parse_symbol_record(tag.payload) {
                    names.insert(id, name);
                }
            }
            _ => {} // unknown tag codes are skipped
        }
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut segments = Vec::with_capacity(blocks.len());

    for (id, bytes) in &blocks {
        let Some(symbol) = names.get(id) else {
            tracing::debug!(character = id, "data record has no exported symbol");
            continue;
        };
        if !seen.insert(symbol.as_str()) {
            tracing::warn!(%symbol, "duplicate symbol, later segment wins on disk");
        }
        segments.push(Segment {
            symbol: symbol.clone(),
            bytes: bytes.clone(),
        });
    }

    segments
}

/// Split a data record payload into (character id, asset bytes)
fn parse_data_record(payload: &[u8]) -> Option<(u16, &[u8])> {
    // u16 id + u32 reserved
    if payload.len() < 6 {
        return None;
    }
    let id = LittleEndian::read_u16(payload);
    Some((id, &payload[6..]))
}

/// Parse a symbol record payload into (character id, name) pairs.
///
/// Stops early on a truncated entry or a name that is not valid UTF-8;
/// entries parsed so far are kept.
fn parse_symbol_record(payload: &[u8]) -> Vec<(u16, String)> {
    let mut pairs = Vec::new();

    if payload.len() < 2 {
        return pairs;
    }
    let count = LittleEndian::read_u16(payload) as usize;
    let mut pos = 2;

    for _ in 0..count {
        if pos + 2 > payload.len() {
            break;
        }
        let id = LittleEndian::read_u16(&payload[pos..]);
        pos += 2;

        let Some(nul) = payload[pos..].iter().position(|&b| b == 0) else {
            break;
        };
        match std::str::from_utf8(&payload[pos..pos + nul]) {
            Ok(name) => pairs.push((id, name.to_string())),
            Err(_) => {
                tracing::debug!(character = id, "symbol name is not valid UTF-8");
            }
        }
        pos += nul + 1;
    }

    pairs
}
