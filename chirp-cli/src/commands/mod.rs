//! Command implementations for the chirp CLI

pub mod migrate;
pub mod serve;

pub use migrate::run_migrate;
pub use serve::run_serve;

use std::path::Path;

use anyhow::{Context, Result};
use chirp_server::Settings;

/// Settings from `--config` when given, otherwise defaults; the environment
/// applies on top either way.
pub(crate) fn load_settings(config: Option<&Path>) -> Result<Settings> {
    match config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Settings::from_env().context("Invalid settings in environment"),
    }
}
