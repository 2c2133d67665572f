//! Binary VDF encoder.

use crate::{Map, TAG_END, TAG_INT, TAG_MAP, TAG_STRING, Value, VdfString};

/// Encodes a root map back into the exact wire layout [`decode`] accepts.
///
/// Infallible by construction: [`VdfString`] refuses interior NUL bytes at
/// build time, so nothing reachable here can corrupt the delimiter scheme.
///
/// [`decode`]: crate::decode
pub fn encode(root: &Map) -> Vec<u8> {
    let mut out = Vec::new();
    encode_map(root, &mut out);
    out
}

fn encode_map(map: &Map, out: &mut Vec<u8>) {
    for (key, value) in map.iter() {
        match value {
            Value::Map(m) => {
                out.push(TAG_MAP);
                write_string(key, out);
                encode_map(m, out);
            }
            Value::Str(s) => {
                out.push(TAG_STRING);
                write_string(key, out);
                write_string(s, out);
            }
            Value::Int(i) => {
                out.push(TAG_INT);
                write_string(key, out);
                out.extend_from_slice(&i.to_le_bytes());
            }
        }
    }
    out.push(TAG_END);
}

fn write_string(s: &VdfString, out: &mut Vec<u8>) {
    out.extend_from_slice(s.as_bytes());
    out.push(0x00);
}
