//! The decoded tree: raw strings, ordered maps, tagged values.

use std::borrow::Cow;
use std::fmt;

use crate::VdfError;

/// A raw VDF string: arbitrary bytes guaranteed to contain no interior NUL.
///
/// Strings are kept as raw bytes rather than `String` so files containing
/// non-UTF-8 text (Steam uses the platform's single-byte encoding for some
/// locales) survive a decode/encode round trip byte-identically.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct VdfString(Vec<u8>);

impl VdfString {
    /// Builds a string, rejecting embedded NUL bytes.
    ///
    /// NUL is the wire delimiter; accepting one would silently corrupt the
    /// stream at encode time, so construction is where it gets refused.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, VdfError> {
        let bytes = bytes.into();
        if bytes.contains(&0) {
            return Err(VdfError::EmbeddedNul);
        }
        Ok(Self(bytes))
    }

    /// Used by the decoder, which splits on the NUL terminator and therefore
    /// can never produce an interior NUL.
    pub(crate) fn from_raw(bytes: Vec<u8>) -> Self {
        debug_assert!(!bytes.contains(&0));
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lossy UTF-8 view, for display and typed projection.
    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// ASCII-case-insensitive comparison against a key name.
    ///
    /// Steam has historically emitted both `AppName` and `appname`.
    pub fn eq_ignore_ascii_case(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.as_bytes())
    }
}

impl TryFrom<&str> for VdfString {
    type Error = VdfError;

    fn try_from(s: &str) -> Result<Self, VdfError> {
        Self::new(s.as_bytes().to_vec())
    }
}

impl fmt::Debug for VdfString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_str_lossy())
    }
}

/// An ordered key-value map.
///
/// Order is part of the wire format, and duplicate keys are representable
/// (the format does not forbid them), so this is a pair list rather than a
/// hash map. Lookups return the first match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map(Vec<(VdfString, Value)>);

impl Map {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the value for the first exactly-matching key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(k, _)| k.as_bytes() == key.as_bytes())
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0
            .iter_mut()
            .find(|(k, _)| k.as_bytes() == key.as_bytes())
            .map(|(_, v)| v)
    }

    /// Returns the value for the first key matching ASCII-case-insensitively.
    pub fn get_ignore_ascii_case(&self, key: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Replaces the first occurrence of `key` in place, or appends.
    pub fn set(&mut self, key: VdfString, value: Value) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.0.push((key, value)),
        }
    }

    /// Appends unconditionally, allowing duplicate keys.
    pub fn push(&mut self, key: VdfString, value: Value) {
        self.0.push((key, value));
    }

    pub fn get_index(&self, index: usize) -> Option<(&VdfString, &Value)> {
        self.0.get(index).map(|(k, v)| (k, v))
    }

    pub fn get_index_mut(&mut self, index: usize) -> Option<(&VdfString, &mut Value)> {
        self.0.get_mut(index).map(|(k, v)| (&*k, v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VdfString, &Value)> {
        self.0.iter().map(|(k, v)| (k, v))
    }
}

/// One node in the decoded tree. This is the true wire model; typed views
/// (shortcut records) are projected onto it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Map(Map),
    Str(VdfString),
    Int(i32),
}

impl Value {
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&VdfString> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}
