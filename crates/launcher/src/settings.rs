//! Tool settings: where scripts and the runner live, persisted as JSON.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::LauncherError;

/// Directory configuration for the tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Where generated launch scripts are written.
    pub scripts_dir: PathBuf,
    /// Where the compatibility runner binary is installed.
    pub runner_dir: PathBuf,
    /// Shared compatibility prefix for titles without a per-title override.
    /// `None` means the runner's own default prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_prefix_dir: Option<PathBuf>,
    /// Write a `.toml` runner config next to each script and launch via
    /// `--config` instead of inlining the executable.
    #[serde(default)]
    pub prefer_toml: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let home = home_dir();
        Self {
            scripts_dir: home.join("Games").join("Launch Scripts"),
            runner_dir: home.join("Games").join("umu"),
            global_prefix_dir: None,
            prefer_toml: false,
        }
    }
}

impl Settings {
    /// Loads settings, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Self, LauncherError> {
        match fs::read_to_string(path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), LauncherError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Full path of the runner binary.
    pub fn runner_path(&self) -> PathBuf {
        self.runner_dir.join("umu-run")
    }
}

/// Returns the user's home directory, `/tmp` as a last resort.
fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}
