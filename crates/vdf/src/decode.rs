//! Binary VDF decoder.

use crate::{Map, TAG_END, TAG_INT, TAG_MAP, TAG_STRING, Value, VdfError, VdfString};

/// Decodes a complete binary VDF file into its root map.
///
/// The file root is one map body terminated by a final `0x08`; for
/// `shortcuts.vdf` that root holds the single key `shortcuts`. Unknown keys
/// are preserved verbatim, so any well-formed Steam-produced file decodes
/// without loss. Rejects truncated input, unknown tag bytes, unterminated
/// strings and trailing bytes after the root terminator.
pub fn decode(data: &[u8]) -> Result<Map, VdfError> {
    let mut pos = 0;
    let root = decode_map(data, &mut pos)?;
    if pos != data.len() {
        return Err(VdfError::TrailingBytes(data.len() - pos));
    }
    Ok(root)
}

/// Decodes one map body: `(tag, key, payload)*` terminated by `0x08`.
fn decode_map(data: &[u8], pos: &mut usize) -> Result<Map, VdfError> {
    let mut map = Map::new();
    loop {
        let tag_pos = *pos;
        let tag = *data.get(tag_pos).ok_or(VdfError::UnclosedMap)?;
        *pos += 1;

        if tag == TAG_END {
            return Ok(map);
        }

        let key = read_string(data, pos)?;

        // The single dispatch point of the format: a 0x00 where a type tag
        // is expected means the value is itself a map body.
        let value = match tag {
            TAG_MAP => Value::Map(decode_map(data, pos)?),
            TAG_STRING => Value::Str(read_string(data, pos)?),
            TAG_INT => Value::Int(read_int(data, pos)?),
            _ => return Err(VdfError::UnknownTag { tag, pos: tag_pos }),
        };

        map.push(key, value);
    }
}

/// Reads a NUL-terminated raw string and advances past the terminator.
fn read_string(data: &[u8], pos: &mut usize) -> Result<VdfString, VdfError> {
    let start = *pos;
    match data[start..].iter().position(|&b| b == 0) {
        Some(len) => {
            *pos = start + len + 1;
            Ok(VdfString::from_raw(data[start..start + len].to_vec()))
        }
        None => Err(VdfError::UnterminatedString(start)),
    }
}

/// Reads exactly 4 little-endian two's-complement bytes.
fn read_int(data: &[u8], pos: &mut usize) -> Result<i32, VdfError> {
    let end = *pos + 4;
    if end > data.len() {
        return Err(VdfError::UnexpectedEof(*pos));
    }
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&data[*pos..end]);
    *pos = end;
    Ok(i32::from_le_bytes(buf))
}
