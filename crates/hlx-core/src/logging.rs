//! Logging init for the CLI and server.
//!
//! Events go to `~/.local/state/hlx/hlx.log`. When that file can't be opened
//! (read-only home, sandbox), they go to stderr instead.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,hlx=debug,hlx_core=debug,hlx_cli=debug";
const LOG_FILE_NAME: &str = "hlx.log";

/// Where log events ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    File(PathBuf),
    Stderr,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Opens (appending) the log file inside `state_dir`, creating the dir.
pub fn open_log_file(state_dir: &Path) -> Result<(PathBuf, fs::File)> {
    fs::create_dir_all(state_dir)
        .with_context(|| format!("create log dir {}", state_dir.display()))?;
    let path = state_dir.join(LOG_FILE_NAME);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;
    Ok((path, file))
}

fn xdg_log_file() -> Result<(PathBuf, fs::File)> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("hlx")?;
    open_log_file(&xdg_dirs.get_state_home())
}

/// Installs the global subscriber. Call once, as early as possible.
pub fn init_logging() -> LogDestination {
    match xdg_log_file() {
        Ok((path, file)) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
            tracing::info!("hlx logging initialized at {}", path.display());
            LogDestination::File(path)
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .init();
            tracing::warn!("log file unavailable, logging to stderr: {:#}", e);
            LogDestination::Stderr
        }
    }
}
