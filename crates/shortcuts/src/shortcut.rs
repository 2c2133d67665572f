//! Typed view of one shortcut slot, projected onto the VDF wire model.

use steamshelf_vdf::{Map, Value, VdfError, VdfString};

use crate::ShortcutError;

/// Caller-supplied configuration for one non-Steam title.
///
/// `exe` is the launch script path; the appid is always recomputed from
/// `(exe, name)`, never taken from the caller.
#[derive(Debug, Clone, Default)]
pub struct ShortcutConfig {
    pub name: String,
    pub exe: String,
    /// Working directory; derived from `exe`'s parent when empty.
    pub start_dir: String,
    pub icon: String,
    pub launch_options: String,
    pub tags: Vec<String>,
    pub hidden: bool,
}

/// One complete shortcut record.
///
/// Every field Steam expects is always present; the format has no optional
/// keys. Fields this tool does not model are carried in `extra` verbatim so
/// a rewrite of the slot stays lossless.
#[derive(Debug, Clone, PartialEq)]
pub struct Shortcut {
    pub app_id: u32,
    pub app_name: String,
    pub exe: String,
    pub start_dir: String,
    pub icon: String,
    pub shortcut_path: String,
    pub launch_options: String,
    pub is_hidden: bool,
    pub allow_desktop_config: bool,
    pub allow_overlay: bool,
    pub open_vr: bool,
    pub devkit: bool,
    pub devkit_game_id: String,
    pub last_play_time: u32,
    pub tags: Vec<String>,
    /// Unrecognized slot fields, preserved in their decoded order.
    pub extra: Map,
}

/// Known slot keys, lowercase, in the order Steam writes them.
const KEY_APPID: &str = "appid";
const KEY_APP_NAME: &str = "appname";
const KEY_EXE: &str = "exe";
const KEY_START_DIR: &str = "startdir";
const KEY_ICON: &str = "icon";
const KEY_SHORTCUT_PATH: &str = "shortcutpath";
const KEY_LAUNCH_OPTIONS: &str = "launchoptions";
const KEY_IS_HIDDEN: &str = "ishidden";
const KEY_ALLOW_DESKTOP_CONFIG: &str = "allowdesktopconfig";
const KEY_ALLOW_OVERLAY: &str = "allowoverlay";
const KEY_OPEN_VR: &str = "openvr";
const KEY_DEVKIT: &str = "devkit";
const KEY_DEVKIT_GAME_ID: &str = "devkitgameid";
const KEY_LAST_PLAY_TIME: &str = "lastplaytime";
const KEY_TAGS: &str = "tags";

/// Generates a Steam shortcut app ID from executable string and name.
///
/// Matches Steam's algorithm: `CRC32(exe + name) | 0x80000000 | 0x02000000`.
/// Deterministic across runs, so the same logical shortcut always resolves
/// to the same registry slot.
pub fn generate_app_id(exe: &str, name: &str) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(exe.as_bytes());
    hasher.update(name.as_bytes());
    hasher.finalize() | 0x80000000 | 0x02000000
}

/// Wraps a path in double quotes the way Steam stores `Exe` and `StartDir`.
fn quote(path: &str) -> String {
    if path.len() >= 2 && path.starts_with('"') && path.ends_with('"') {
        path.to_string()
    } else {
        format!("\"{path}\"")
    }
}

fn reject_nul(field: &str, value: &str) -> Result<(), ShortcutError> {
    if value.contains('\0') {
        return Err(ShortcutError::Validation(format!(
            "{field} contains an embedded NUL byte"
        )));
    }
    Ok(())
}

impl Shortcut {
    /// Builds a validated record from caller configuration.
    ///
    /// Rejects empty `name`/`exe`, embedded NUL in any string field, and
    /// empty tag entries — all before any file I/O happens. Flags default
    /// the way Steam creates entries: overlay and desktop config enabled,
    /// everything else off, playtime zero.
    pub fn from_config(cfg: &ShortcutConfig) -> Result<Self, ShortcutError> {
        if cfg.name.is_empty() {
            return Err(ShortcutError::Validation("name must not be empty".into()));
        }
        if cfg.exe.is_empty() {
            return Err(ShortcutError::Validation("exe must not be empty".into()));
        }
        reject_nul("name", &cfg.name)?;
        reject_nul("exe", &cfg.exe)?;
        reject_nul("start_dir", &cfg.start_dir)?;
        reject_nul("icon", &cfg.icon)?;
        reject_nul("launch_options", &cfg.launch_options)?;
        for tag in &cfg.tags {
            if tag.is_empty() {
                return Err(ShortcutError::Validation("tags must not be empty".into()));
            }
            reject_nul("tag", tag)?;
        }

        let exe = quote(&cfg.exe);
        let start_dir = if cfg.start_dir.is_empty() {
            let parent = std::path::Path::new(&cfg.exe)
                .parent()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            quote(&parent)
        } else {
            quote(&cfg.start_dir)
        };

        Ok(Self {
            app_id: generate_app_id(&exe, &cfg.name),
            app_name: cfg.name.clone(),
            exe,
            start_dir,
            icon: cfg.icon.clone(),
            shortcut_path: String::new(),
            launch_options: cfg.launch_options.clone(),
            is_hidden: cfg.hidden,
            allow_desktop_config: true,
            allow_overlay: true,
            open_vr: false,
            devkit: false,
            devkit_game_id: String::new(),
            last_play_time: 0,
            tags: cfg.tags.clone(),
            extra: Map::new(),
        })
    }

    /// Projects a decoded slot map into a typed record.
    ///
    /// Tolerant by design: key matching is ASCII-case-insensitive (Steam has
    /// emitted both `AppName` and `appname` over the years), missing fields
    /// resolve to the documented defaults, and anything unrecognized — or
    /// recognized but of an unexpected type — lands in `extra` untouched.
    pub fn from_map(map: &Map) -> Self {
        let mut sc = Self {
            app_id: 0,
            app_name: String::new(),
            exe: String::new(),
            start_dir: String::new(),
            icon: String::new(),
            shortcut_path: String::new(),
            launch_options: String::new(),
            is_hidden: false,
            allow_desktop_config: true,
            allow_overlay: true,
            open_vr: false,
            devkit: false,
            devkit_game_id: String::new(),
            last_play_time: 0,
            tags: Vec::new(),
            extra: Map::new(),
        };

        for (key, value) in map.iter() {
            let lower = key.to_str_lossy().to_ascii_lowercase();
            let recognized = match (lower.as_str(), value) {
                (KEY_APPID, Value::Int(i)) => {
                    sc.app_id = *i as u32;
                    true
                }
                (KEY_APP_NAME, Value::Str(s)) => {
                    sc.app_name = s.to_str_lossy().into_owned();
                    true
                }
                (KEY_EXE, Value::Str(s)) => {
                    sc.exe = s.to_str_lossy().into_owned();
                    true
                }
                (KEY_START_DIR, Value::Str(s)) => {
                    sc.start_dir = s.to_str_lossy().into_owned();
                    true
                }
                (KEY_ICON, Value::Str(s)) => {
                    sc.icon = s.to_str_lossy().into_owned();
                    true
                }
                (KEY_SHORTCUT_PATH, Value::Str(s)) => {
                    sc.shortcut_path = s.to_str_lossy().into_owned();
                    true
                }
                (KEY_LAUNCH_OPTIONS, Value::Str(s)) => {
                    sc.launch_options = s.to_str_lossy().into_owned();
                    true
                }
                (KEY_IS_HIDDEN, Value::Int(i)) => {
                    sc.is_hidden = *i != 0;
                    true
                }
                (KEY_ALLOW_DESKTOP_CONFIG, Value::Int(i)) => {
                    sc.allow_desktop_config = *i != 0;
                    true
                }
                (KEY_ALLOW_OVERLAY, Value::Int(i)) => {
                    sc.allow_overlay = *i != 0;
                    true
                }
                (KEY_OPEN_VR, Value::Int(i)) => {
                    sc.open_vr = *i != 0;
                    true
                }
                (KEY_DEVKIT, Value::Int(i)) => {
                    sc.devkit = *i != 0;
                    true
                }
                (KEY_DEVKIT_GAME_ID, Value::Str(s)) => {
                    sc.devkit_game_id = s.to_str_lossy().into_owned();
                    true
                }
                (KEY_LAST_PLAY_TIME, Value::Int(i)) => {
                    sc.last_play_time = *i as u32;
                    true
                }
                (KEY_TAGS, Value::Map(m)) => {
                    sc.tags = m
                        .iter()
                        .filter_map(|(_, v)| v.as_str())
                        .map(|s| s.to_str_lossy().into_owned())
                        .collect();
                    true
                }
                _ => false,
            };

            if !recognized {
                sc.extra.push(key.clone(), value.clone());
            }
        }

        sc
    }

    /// Emits the slot map in Steam's canonical field order, flags as 0/1
    /// ints, tags as a nested index map, `extra` fields appended last.
    ///
    /// Fails only if a string field has been mutated to contain a NUL byte
    /// after validation.
    pub fn to_map(&self) -> Result<Map, VdfError> {
        let mut map = Map::new();
        push_int(&mut map, "appid", self.app_id as i32)?;
        push_str(&mut map, "AppName", &self.app_name)?;
        push_str(&mut map, "Exe", &self.exe)?;
        push_str(&mut map, "StartDir", &self.start_dir)?;
        push_str(&mut map, "icon", &self.icon)?;
        push_str(&mut map, "ShortcutPath", &self.shortcut_path)?;
        push_str(&mut map, "LaunchOptions", &self.launch_options)?;
        push_int(&mut map, "IsHidden", self.is_hidden as i32)?;
        push_int(
            &mut map,
            "AllowDesktopConfig",
            self.allow_desktop_config as i32,
        )?;
        push_int(&mut map, "AllowOverlay", self.allow_overlay as i32)?;
        push_int(&mut map, "OpenVR", self.open_vr as i32)?;
        push_int(&mut map, "Devkit", self.devkit as i32)?;
        push_str(&mut map, "DevkitGameID", &self.devkit_game_id)?;
        push_int(&mut map, "LastPlayTime", self.last_play_time as i32)?;

        let mut tags = Map::new();
        for (i, tag) in self.tags.iter().enumerate() {
            push_str(&mut tags, &i.to_string(), tag)?;
        }
        map.push(VdfString::try_from("tags")?, Value::Map(tags));

        for (key, value) in self.extra.iter() {
            map.push(key.clone(), value.clone());
        }

        Ok(map)
    }
}

fn push_str(map: &mut Map, key: &str, value: &str) -> Result<(), VdfError> {
    map.push(
        VdfString::try_from(key)?,
        Value::Str(VdfString::try_from(value)?),
    );
    Ok(())
}

fn push_int(map: &mut Map, key: &str, value: i32) -> Result<(), VdfError> {
    map.push(VdfString::try_from(key)?, Value::Int(value));
    Ok(())
}
