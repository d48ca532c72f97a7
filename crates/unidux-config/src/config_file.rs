use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = ".unidux.toml";

/// Load config file content from CWD first, then the user config directory
///
/// Searches for:
/// 1. `.unidux.toml` in the current working directory
/// 2. `config.toml` in the application config directory
///
/// Returns the file content if found, None otherwise.
pub fn load_config_file() -> Option<String> {
    // Try current directory first
    if let Ok(content) = std::fs::read_to_string(CONFIG_FILE) {
        log::debug!("Loaded config from {}", CONFIG_FILE);
        return Some(content);
    }

    if let Some(user_config) = user_config_path() {
        if let Ok(content) = std::fs::read_to_string(&user_config) {
            log::debug!("Loaded config from {}", user_config.display());
            return Some(content);
        }
    }

    None
}

/// Read an explicitly requested config file
///
/// Unlike [`load_config_file`], a missing or unreadable file is an error.
pub fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))
}

fn user_config_path() -> Option<PathBuf> {
    crate::paths::app_config_path().ok()
}
