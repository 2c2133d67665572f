//! Read-modify-write reconciliation of `shortcuts.vdf`.
//!
//! One upsert is: read → decode → mutate exactly one slot → encode →
//! write-temp → rename. The rename is atomic with respect to the original
//! file's visibility, so an interrupted write never leaves a partial file
//! behind. Slots the upsert does not own stay as raw decoded maps and
//! re-encode byte-identically.

use std::fs;
use std::io;
use std::path::Path;

use steamshelf_vdf::{Map, Value, VdfString, decode, encode};
use tracing::{debug, info, warn};

use crate::{Shortcut, ShortcutConfig, ShortcutError};

const ROOT_KEY: &str = "shortcuts";

/// Non-fatal conditions observed during an upsert. Surfaced to the caller
/// for user messaging; none of them abort the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Another existing slot shares the resolved appid. Only the first slot
    /// in iteration order was updated; this one was left untouched.
    DuplicateAppId { app_id: u32, slot: String },

    /// A key under "shortcuts" is not a stringified integer.
    NonNumericSlot { key: String },
}

/// What an upsert resolved to, for art-cache keying and UI feedback.
#[derive(Debug, Clone)]
pub struct UpsertOutcome {
    pub app_id: u32,
    /// Slot index under the "shortcuts" key.
    pub slot: u32,
    /// True if a new slot was appended, false if an existing one was updated.
    pub created: bool,
    pub warnings: Vec<Warning>,
}

/// In-memory view of one profile's shortcut registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    root: Map,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates an empty registry. The "shortcuts" map is materialized on
    /// first upsert.
    pub fn new() -> Self {
        Self { root: Map::new() }
    }

    /// Decodes registry bytes. Unknown keys anywhere in the tree are kept.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ShortcutError> {
        Ok(Self { root: decode(data)? })
    }

    /// Loads the registry from disk. An absent or zero-length file yields an
    /// empty registry; malformed bytes are a hard error so the original file
    /// is never clobbered by a half-understood rewrite.
    pub fn load(path: &Path) -> Result<Self, ShortcutError> {
        match fs::read(path) {
            Ok(data) if data.is_empty() => Ok(Self::new()),
            Ok(data) => Self::from_bytes(&data),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no existing shortcuts file, starting empty");
                Ok(Self::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        encode(&self.root)
    }

    /// Iterates slot entries under the "shortcuts" key.
    pub fn slots(&self) -> impl Iterator<Item = (&VdfString, &Map)> {
        self.root
            .get(ROOT_KEY)
            .and_then(Value::as_map)
            .into_iter()
            .flat_map(|m| m.iter())
            .filter_map(|(k, v)| v.as_map().map(|m| (k, m)))
    }

    /// Typed view of every slot.
    pub fn shortcuts(&self) -> Vec<Shortcut> {
        self.slots().map(|(_, m)| Shortcut::from_map(m)).collect()
    }

    fn shortcuts_mut(&mut self) -> Result<&mut Map, ShortcutError> {
        if !matches!(self.root.get(ROOT_KEY), Some(Value::Map(_))) {
            self.root
                .set(VdfString::try_from(ROOT_KEY)?, Value::Map(Map::new()));
        }
        self.root
            .get_mut(ROOT_KEY)
            .and_then(Value::as_map_mut)
            .ok_or_else(|| ShortcutError::Validation("registry has no shortcuts map".into()))
    }

    /// Merges one record into the registry, keyed by appid.
    ///
    /// On update the slot value is replaced in place, preserving the
    /// existing record's `LastPlayTime` and carrying its unrecognized
    /// fields along. On insert the record is appended at the next
    /// contiguous slot index. Existing slot keys are never reassigned.
    pub fn upsert(&mut self, mut record: Shortcut) -> Result<UpsertOutcome, ShortcutError> {
        let app_id = record.app_id;
        let mut warnings = Vec::new();
        let shortcuts = self.shortcuts_mut()?;

        // One scan: find the update target (first appid match), note later
        // duplicates, and track the highest numeric slot key for appends.
        let mut target: Option<(usize, u32)> = None;
        let mut max_slot: Option<u32> = None;
        for index in 0..shortcuts.len() {
            let Some((key, value)) = shortcuts.get_index(index) else {
                break;
            };
            let key_text = key.to_str_lossy().into_owned();
            match key_text.parse::<u32>() {
                Ok(n) => max_slot = Some(max_slot.map_or(n, |m| m.max(n))),
                Err(_) => warnings.push(Warning::NonNumericSlot {
                    key: key_text.clone(),
                }),
            }

            let Some(slot) = value.as_map() else { continue };
            if slot_app_id(slot) != Some(app_id) {
                continue;
            }
            match target {
                None => {
                    let slot_index = key_text.parse::<u32>().unwrap_or(index as u32);
                    target = Some((index, slot_index));
                }
                Some(_) => {
                    warn!(app_id, slot = %key_text, "duplicate appid in registry, leaving untouched");
                    warnings.push(Warning::DuplicateAppId {
                        app_id,
                        slot: key_text,
                    });
                }
            }
        }

        let outcome = match target {
            Some((index, slot_index)) => {
                // A reconfiguration pass must not reset playtime, and must
                // not drop fields some other tool wrote into this slot.
                if let Some((_, value)) = shortcuts.get_index_mut(index) {
                    if let Some(existing) = value.as_map() {
                        let existing = Shortcut::from_map(existing);
                        record.last_play_time = existing.last_play_time;
                        record.extra = existing.extra;
                    }
                    *value = Value::Map(record.to_map()?);
                }
                debug!(app_id, slot = slot_index, "updated existing shortcut slot");
                UpsertOutcome {
                    app_id,
                    slot: slot_index,
                    created: false,
                    warnings,
                }
            }
            None => {
                let slot_index = max_slot.map_or(0, |m| m + 1);
                shortcuts.push(
                    VdfString::try_from(slot_index.to_string().as_str())?,
                    Value::Map(record.to_map()?),
                );
                debug!(app_id, slot = slot_index, "appended new shortcut slot");
                UpsertOutcome {
                    app_id,
                    slot: slot_index,
                    created: true,
                    warnings,
                }
            }
        };

        Ok(outcome)
    }

    /// Serializes and writes the registry atomically: temp file next to the
    /// target, then rename over it.
    pub fn save(&self, path: &Path) -> Result<(), ShortcutError> {
        let bytes = self.to_bytes();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "shortcuts.vdf".to_string());
        let tmp = path.with_file_name(format!("{file_name}.tmp"));

        fs::write(&tmp, &bytes)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        info!(path = %path.display(), bytes = bytes.len(), "wrote shortcut registry");
        Ok(())
    }
}

/// Reads the appid from a raw slot map.
fn slot_app_id(slot: &Map) -> Option<u32> {
    slot.get_ignore_ascii_case("appid")
        .and_then(Value::as_int)
        .map(|i| i as u32)
}

/// One-call read-modify-write: validate the config, load the registry (or
/// start empty), upsert, save atomically.
///
/// Validation happens before any file is touched.
pub fn upsert_shortcut(
    path: &Path,
    config: &ShortcutConfig,
) -> Result<UpsertOutcome, ShortcutError> {
    let record = Shortcut::from_config(config)?;
    let mut registry = Registry::load(path)?;
    let outcome = registry.upsert(record)?;
    registry.save(path)?;
    Ok(outcome)
}
