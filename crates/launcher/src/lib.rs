//! Launch script generation for titles that run through a compatibility
//! runner, plus the tool's own settings file.
//!
//! The generated script is what the Steam shortcut points at; this crate
//! never executes it and never checks that the runner exists — both are the
//! caller's job.

pub mod script;
pub mod settings;

pub use script::{LaunchSpec, generate, generate_with_config, script_name};
pub use settings::Settings;

/// Errors for script generation and settings persistence.
#[derive(Debug, thiserror::Error)]
pub enum LauncherError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("runner config error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("invalid launch spec: {0}")]
    Validation(String),
}
