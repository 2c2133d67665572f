//! Steam profile directory layout.
//!
//! The active Steam installation is always passed in explicitly — which
//! install and which user profile are active is the caller's decision, and
//! keeping it out of process-wide state lets one process handle several
//! profiles without cross-contamination.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ShortcutError;

/// Grid artwork kinds, named by the filename suffix Steam looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtworkKind {
    /// 460x215 horizontal capsule, `{appid}.png`.
    Grid,
    /// 1920x620 header, `{appid}_hero.png`.
    Hero,
    /// Transparent logo, `{appid}_logo.png`.
    Logo,
    /// Square icon, `{appid}_icon.png`.
    Icon,
    /// 600x900 vertical capsule, `{appid}p.png`.
    Portrait,
}

impl ArtworkKind {
    pub fn all() -> &'static [ArtworkKind] {
        &[
            ArtworkKind::Grid,
            ArtworkKind::Hero,
            ArtworkKind::Logo,
            ArtworkKind::Icon,
            ArtworkKind::Portrait,
        ]
    }

    fn suffix(self) -> &'static str {
        match self {
            ArtworkKind::Grid => "",
            ArtworkKind::Hero => "_hero",
            ArtworkKind::Logo => "_logo",
            ArtworkKind::Icon => "_icon",
            ArtworkKind::Portrait => "p",
        }
    }
}

impl fmt::Display for ArtworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtworkKind::Grid => "grid",
            ArtworkKind::Hero => "hero",
            ArtworkKind::Logo => "logo",
            ArtworkKind::Icon => "icon",
            ArtworkKind::Portrait => "portrait",
        };
        write!(f, "{name}")
    }
}

/// Path helpers rooted at one Steam installation directory.
#[derive(Debug, Clone)]
pub struct SteamDir {
    base: PathBuf,
}

impl SteamDir {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn userdata_dir(&self) -> PathBuf {
        self.base.join("userdata")
    }

    /// Per-user config directory holding `shortcuts.vdf` and `grid/`.
    pub fn config_dir(&self, user_id: &str) -> PathBuf {
        self.userdata_dir().join(user_id).join("config")
    }

    pub fn shortcuts_path(&self, user_id: &str) -> PathBuf {
        self.config_dir(user_id).join("shortcuts.vdf")
    }

    pub fn grid_dir(&self, user_id: &str) -> PathBuf {
        self.config_dir(user_id).join("grid")
    }

    pub fn ensure_grid_dir(&self, user_id: &str) -> Result<(), ShortcutError> {
        fs::create_dir_all(self.grid_dir(user_id))?;
        Ok(())
    }

    /// Artwork file path keyed by the appid an upsert resolved.
    pub fn artwork_path(
        &self,
        user_id: &str,
        app_id: u32,
        kind: ArtworkKind,
        ext: &str,
    ) -> PathBuf {
        let ext = ext.trim_start_matches('.');
        let ext = if ext.is_empty() { "png" } else { ext };
        self.grid_dir(user_id)
            .join(format!("{}{}.{}", app_id, kind.suffix(), ext))
    }

    /// Enumerates user profiles: numeric subdirectories of `userdata`,
    /// sorted. Skips `0`, the anonymous placeholder account.
    pub fn profiles(&self) -> Result<Vec<String>, ShortcutError> {
        let dir = self.userdata_dir();
        let mut ids: Vec<u64> = Vec::new();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Ok(id) = entry.file_name().to_string_lossy().parse::<u64>() {
                if id != 0 {
                    ids.push(id);
                }
            }
        }
        ids.sort_unstable();
        Ok(ids.into_iter().map(|id| id.to_string()).collect())
    }
}
