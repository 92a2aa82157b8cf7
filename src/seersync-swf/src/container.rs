//! Container header parsing and body decompression

use std::io::Read;

use byteorder::{ByteOrder, LittleEndian};
use flate2::read::ZlibDecoder;

use crate::{Error, Result, HEADER_SIZE, SIG_DEFLATE, SIG_STORED};

/// Container header (7 bytes)
#[derive(Debug, Clone, Copy)]
pub struct Header {
    /// Signature bytes selecting the compression scheme
    pub signature: [u8; 3],
    /// Declared decompressed length. Advisory only: the actual body may
    /// inflate to a different size.
    pub declared_len: u32,
}

impl Header {
    /// Parse a container header directly from a slice
    #[inline]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::TooShort {
                needed: HEADER_SIZE,
                actual: data.len(),
            });
        }

        let signature = [data[0], data[1], data[2]];
        if signature != SIG_DEFLATE && signature != SIG_STORED {
            return Err(Error::UnknownSignature(data[0], data[1], data[2]));
        }

        Ok(Self {
            signature,
            declared_len: LittleEndian::read_u32(&data[3..7]),
        })
    }

    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.signature == SIG_DEFLATE
    }
}

/// Decompress a container into its flat record-stream body.
///
/// A deflate body that fails to inflate is fatal for the whole container;
/// no partial output is produced.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let header = Header::from_bytes(data)?;
    let body = &data[HEADER_SIZE..];

    if !header.is_compressed() {
        return Ok(body.to_vec());
    }

    // Capacity hint only; the declared length is untrusted
    let hint = (header.declared_len as usize).min(1 << 24);
    let mut decoder = ZlibDecoder::new(body);
    let mut inflated = Vec::with_capacity(hint);
    decoder.read_to_end(&mut inflated)?;

    if inflated.len() != header.declared_len as usize {
        tracing::debug!(
            declared = header.declared_len,
            actual = inflated.len(),
            "declared container length differs from inflated size"
        );
    }

    Ok(inflated)
}
