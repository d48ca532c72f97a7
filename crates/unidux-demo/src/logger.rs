//! File-based logging using simplelog
//!
//! The terminal is owned by the UI, so logs go to a file.
//! Log file location depends on build type:
//! - Debug builds: current working directory (for development convenience)
//! - Release builds: cache directory (~/.cache/unidux/ on Linux)

use anyhow::{Context, Result};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

/// Get the log file path based on build type
fn log_file_path() -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let filename = format!("unidux-{}.log", timestamp);

    if cfg!(debug_assertions) {
        PathBuf::from(filename)
    } else {
        unidux_config::cache_dir()
            .map(|dir| dir.join(&filename))
            .unwrap_or_else(|_| PathBuf::from(filename))
    }
}

/// Level used until the configured one is known
const STARTUP_LEVEL: LevelFilter = LevelFilter::Debug;

/// `RUST_LOG`, if set to something we understand, else `configured`
fn effective_level(rust_log: Option<&str>, configured: LevelFilter) -> LevelFilter {
    rust_log
        .and_then(|value| value.parse().ok())
        .unwrap_or(configured)
}

fn rust_log() -> Option<String> {
    std::env::var("RUST_LOG").ok()
}

/// Initialize file-based logging
///
/// Call this before loading configuration so that config messages are
/// captured; [`set_level`] applies the configured level afterwards.
/// Returns the path of the log file.
pub fn init() -> Result<PathBuf> {
    let log_file = log_file_path();

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset_to_local()
        .unwrap_or_else(|c| c) // Fallback if local time offset fails
        .build();

    let file = File::create(&log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;

    // The writer accepts everything, `log::max_level` does the filtering
    WriteLogger::init(LevelFilter::Trace, config, file).context("Failed to initialize logger")?;
    log::set_max_level(effective_level(rust_log().as_deref(), STARTUP_LEVEL));

    Ok(log_file)
}

/// Switch to the configured level; `RUST_LOG` takes precedence
pub fn set_level(configured: LevelFilter) {
    log::set_max_level(effective_level(rust_log().as_deref(), configured));
}
