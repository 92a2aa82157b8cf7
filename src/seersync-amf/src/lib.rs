//! Decoder for the self-describing binary object format carried inside
//! configuration segments
//!
//! The format is a compact object serialization: every value starts with a
//! one-byte type marker, integers use a 1-4 byte variable-width encoding,
//! and strings, trait descriptors, and object instances are deduplicated
//! through per-stream reference tables. Subsequent occurrences are encoded
//! as small integer back-references instead of being repeated.
//!
//! # Format Overview
//!
//! - Byte 0 of each value: type marker (see [`marker`])
//! - Variable-width integer (u29): the high bit of each of the first three
//!   bytes signals continuation (7 value bits each); a fourth byte
//!   contributes all 8 bits, for 29 bits total
//! - String / array / object headers are u29 "ref-or-inline" values: low
//!   bit clear means a reference-table index, low bit set means an inline
//!   definition follows
//!
//! Decoding is strictly single-pass and decode-only. The three reference
//! tables live inside one [`decode`] call and are dropped with it.

mod decode;
mod reader;
mod value;

pub use decode::{decode, Decoder};
pub use value::{Traits, Value};

/// Type markers for encoded values
pub mod marker {
    pub const UNDEFINED: u8 = 0x00;
    pub const NULL: u8 = 0x01;
    pub const FALSE: u8 = 0x02;
    pub const TRUE: u8 = 0x03;
    pub const INTEGER: u8 = 0x04;
    pub const DOUBLE: u8 = 0x05;
    pub const STRING: u8 = 0x06;
    pub const DATE: u8 = 0x08;
    pub const ARRAY: u8 = 0x09;
    pub const OBJECT: u8 = 0x0a;
}

/// Errors from object-stream decoding.
///
/// Any of these aborts the decode of the whole segment; a partially-built
/// tree is never returned.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("object stream too short: need {needed} more bytes, got {actual}")]
    UnexpectedEof { needed: usize, actual: usize },

    #[error("unknown type marker 0x{0:02x}")]
    UnknownMarker(u8),

    #[error("string reference {0} out of table range")]
    StringRefOutOfRange(usize),

    #[error("traits reference {0} out of table range")]
    TraitsRefOutOfRange(usize),

    #[error("object reference {0} out of table range")]
    ObjectRefOutOfRange(usize),

    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("externalizable class {0:?} is not supported")]
    Externalizable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
