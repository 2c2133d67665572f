//! Lossless codec for the binary VDF (KeyValues) variant Steam uses for
//! `shortcuts.vdf`.
//!
//! The decoded tree preserves key order, duplicate keys, unknown fields and
//! raw (not necessarily UTF-8) string bytes, so `encode(&decode(b)?) == b`
//! holds for every well-formed input. Steam's own parser is intolerant of
//! structural deviation, so the round-trip guarantee is the contract here,
//! not a nice-to-have.

mod decode;
mod encode;
mod value;

pub use decode::decode;
pub use encode::encode;
pub use value::{Map, Value, VdfString};

/// Binary VDF type markers.
///
/// `TAG_MAP` doubles as the start sentinel for a nested map: where a value
/// is expected, a `0x00` byte means "a map body follows the key". This is a
/// quirk of the wire format itself, and the one dispatch point the decoder
/// has to get right.
pub(crate) const TAG_MAP: u8 = 0x00;
pub(crate) const TAG_STRING: u8 = 0x01;
pub(crate) const TAG_INT: u8 = 0x02;
pub(crate) const TAG_END: u8 = 0x08;

/// Errors for binary VDF decoding and string construction.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VdfError {
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEof(usize),

    #[error("unknown type tag 0x{tag:02x} at byte {pos}")]
    UnknownTag { tag: u8, pos: usize },

    #[error("unterminated string starting at byte {0}")]
    UnterminatedString(usize),

    #[error("map opened but never closed before end of input")]
    UnclosedMap,

    #[error("{0} trailing bytes after the root map terminator")]
    TrailingBytes(usize),

    #[error("string contains an embedded NUL byte")]
    EmbeddedNul,
}
