//! File-based logging for the CLI.
//!
//! The TUI owns the terminal, so diagnostics go to a log file under the
//! config directory instead of stderr. Filtering honors `ECOPROMPT_LOG`
//! when set, otherwise `--verbose` selects debug over info.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "ECOPROMPT_LOG";

/// Initialize the global tracing subscriber writing to the log file.
pub fn init(verbose: bool) -> Result<()> {
    let path = log_file_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    tracing::debug!("logging initialized at {}", path.display());
    Ok(())
}

/// Path of the log file, `~/.ecoprompt/ecoprompt.log`.
#[must_use]
pub fn log_file_path() -> PathBuf {
    dirs::home_dir()
        .map_or_else(|| PathBuf::from(".ecoprompt"), |home| home.join(".ecoprompt"))
        .join("ecoprompt.log")
}
