//! Launch script generation.
//!
//! The script body is what ties the registry entry to the runner: it sets
//! the working directory, exports the prefix and any extra environment,
//! then execs the runner with the game executable.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::LauncherError;

/// Everything needed to compose one launch script. All strings arrive
/// pre-resolved by the caller (database lookups, prefix selection and
/// runner installation are not this crate's concern).
#[derive(Debug, Clone, Default)]
pub struct LaunchSpec {
    /// The title's real executable, run under the compatibility layer.
    pub game_exe: PathBuf,
    /// Compatibility database id (e.g. `umu-620`). Exported as `GAMEID`;
    /// the runner falls back to `0` when absent.
    pub game_id: Option<String>,
    /// Store the title came from, exported as `STORE` when present.
    pub store: Option<String>,
    /// Per-title prefix override, exported as `WINEPREFIX` when present.
    pub prefix: Option<PathBuf>,
    /// Extra arguments appended after the game executable.
    pub launch_args: Vec<String>,
    /// Additional environment exports, applied after the built-in ones.
    pub extra_env: Vec<(String, String)>,
}

/// Stable script filename for a spec: the database id when known, else the
/// executable's stem plus a hash of its full path. Regenerating the same
/// title always lands on the same path, overwriting instead of
/// accumulating files; a different title never shares it.
pub fn script_name(spec: &LaunchSpec) -> String {
    match &spec.game_id {
        Some(id) if !id.is_empty() => format!("{}.sh", sanitize(id)),
        _ => {
            // The stem alone is ambiguous (every installer is `setup.exe`),
            // so the full path is folded in, same as appid identity.
            let stem = spec
                .game_exe
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "game".to_string());
            let mut hasher = crc32fast::Hasher::new();
            hasher.update(spec.game_exe.as_os_str().as_encoded_bytes());
            format!("{}-{:08x}.sh", sanitize(&stem), hasher.finalize())
        }
    }
}

/// Writes the launch script for `spec` into `scripts_dir` and marks it
/// executable. Returns the script path, which becomes the shortcut's `Exe`.
pub fn generate(
    spec: &LaunchSpec,
    runner: &Path,
    scripts_dir: &Path,
) -> Result<PathBuf, LauncherError> {
    validate(spec)?;

    let body = render(spec, runner);
    fs::create_dir_all(scripts_dir)?;
    let path = scripts_dir.join(script_name(spec));
    fs::write(&path, body)?;
    set_executable(&path)?;

    info!(path = %path.display(), "wrote launch script");
    Ok(path)
}

/// Runner config file contents for `--config` mode, `[umu]` table.
#[derive(Serialize)]
struct UmuConfig<'a> {
    umu: UmuTable<'a>,
}

#[derive(Serialize)]
struct UmuTable<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    prefix: Option<&'a Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    game_id: Option<&'a str>,
    #[serde(rename = "STORE", skip_serializing_if = "Option::is_none")]
    store: Option<&'a str>,
    exe: &'a Path,
}

/// Like [`generate`], but writes a sibling `<name>.toml` runner config
/// (prefix, game id, store and exe under `[umu]`) and a script that invokes
/// the runner with `--config` instead of inlining the executable.
///
/// The prefix is still exported in the script so it also applies to
/// anything the runner spawns outside the config's scope.
pub fn generate_with_config(
    spec: &LaunchSpec,
    runner: &Path,
    scripts_dir: &Path,
) -> Result<PathBuf, LauncherError> {
    validate(spec)?;

    fs::create_dir_all(scripts_dir)?;
    let path = scripts_dir.join(script_name(spec));
    let config_path = path.with_extension("toml");

    let config = UmuConfig {
        umu: UmuTable {
            prefix: spec.prefix.as_deref(),
            game_id: spec.game_id.as_deref(),
            store: spec.store.as_deref(),
            exe: &spec.game_exe,
        },
    };
    fs::write(&config_path, toml::to_string(&config)?)?;

    let body = render_with_config(spec, runner, &config_path);
    fs::write(&path, body)?;
    set_executable(&path)?;

    info!(path = %path.display(), config = %config_path.display(), "wrote launch script with runner config");
    Ok(path)
}

fn validate(spec: &LaunchSpec) -> Result<(), LauncherError> {
    if spec.game_exe.as_os_str().is_empty() {
        return Err(LauncherError::Validation(
            "game executable path must not be empty".into(),
        ));
    }
    for (name, _) in &spec.extra_env {
        if !valid_env_name(name) {
            return Err(LauncherError::Validation(format!(
                "invalid environment variable name: {name:?}"
            )));
        }
    }
    Ok(())
}

/// Shebang, working directory and environment exports shared by both
/// script forms. `GAMEID`/`STORE` are inlined only when the config file
/// does not already carry them.
fn preamble(spec: &LaunchSpec, include_ids: bool) -> String {
    let mut body = String::from("#!/bin/bash\n");

    if let Some(dir) = spec.game_exe.parent() {
        if !dir.as_os_str().is_empty() {
            body.push_str(&format!("cd {}\n", quote(&dir.to_string_lossy())));
        }
    }

    if let Some(prefix) = &spec.prefix {
        body.push_str(&format!(
            "export WINEPREFIX={}\n",
            quote(&prefix.to_string_lossy())
        ));
    }
    if include_ids {
        let game_id = spec.game_id.as_deref().unwrap_or("0");
        body.push_str(&format!("export GAMEID={}\n", quote(game_id)));
        if let Some(store) = &spec.store {
            body.push_str(&format!("export STORE={}\n", quote(store)));
        }
    }
    for (name, value) in &spec.extra_env {
        body.push_str(&format!("export {name}={}\n", quote(value)));
    }

    body
}

fn render(spec: &LaunchSpec, runner: &Path) -> String {
    let mut body = preamble(spec, true);

    body.push_str(&format!(
        "exec {} {}",
        quote(&runner.to_string_lossy()),
        quote(&spec.game_exe.to_string_lossy())
    ));
    for arg in &spec.launch_args {
        body.push(' ');
        body.push_str(&quote(arg));
    }
    body.push('\n');
    body
}

fn render_with_config(spec: &LaunchSpec, runner: &Path, config: &Path) -> String {
    let mut body = preamble(spec, false);

    body.push_str(&format!(
        "exec {} --config {}",
        quote(&runner.to_string_lossy()),
        quote(&config.to_string_lossy())
    ));
    for arg in &spec.launch_args {
        body.push(' ');
        body.push_str(&quote(arg));
    }
    body.push('\n');
    body
}

/// Single-quote shell quoting; embedded quotes become `'\''`.
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

fn valid_env_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Keeps alphanumerics, `.`, `_` and `-`; everything else becomes `_`.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn set_executable(path: &Path) -> Result<(), LauncherError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
