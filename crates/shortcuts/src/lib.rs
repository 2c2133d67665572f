//! Non-Steam shortcut registration: typed records, registry reconciliation
//! and Steam profile path helpers.
//!
//! The registry (`shortcuts.vdf`) usually contains entries this tool never
//! created. Everything here is built around not disturbing those: untouched
//! slots pass through as raw decoded maps, and the one slot an upsert owns
//! carries its unrecognized fields along verbatim.

pub mod registry;
pub mod shortcut;
pub mod steam_dir;

pub use registry::{Registry, UpsertOutcome, Warning, upsert_shortcut};
pub use shortcut::{Shortcut, ShortcutConfig, generate_app_id};
pub use steam_dir::{ArtworkKind, SteamDir};

/// Errors for shortcut registry operations.
#[derive(Debug, thiserror::Error)]
pub enum ShortcutError {
    #[error("VDF error: {0}")]
    Vdf(#[from] steamshelf_vdf::VdfError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid shortcut: {0}")]
    Validation(String),
}
