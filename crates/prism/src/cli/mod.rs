//! Subcommand implementations.

pub mod chat;
pub mod config;
pub mod describe;
pub mod load_image;
pub mod nodes;
pub mod oss;
pub mod presets;
pub mod run;

use std::path::PathBuf;

/// Expand `~` in a user-supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}
