//! Configuration and cache directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/unidux/`, `~/.cache/unidux/`
//! - macOS: `~/Library/Application Support/unidux/`, `~/Library/Caches/unidux/`
//! - Windows: `%APPDATA%\unidux\`, `%LOCALAPPDATA%\unidux\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "unidux";

/// Get the application config directory (not created)
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(APP_NAME))
}

/// Get the application cache directory, creating it if needed
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;
    Ok(dir)
}

/// Get path to the user-level config file
pub fn app_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}
