//! File-based tracing setup.
//!
//! The TUI owns the terminal, so log lines go to
//! `$XDG_STATE_HOME/sup/sup.log` instead. The filter comes from `SUP_LOG`,
//! then the config file's `log_level`, then `info`.

use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "SUP_LOG";

/// Default log file location.
pub fn log_path() -> PathBuf {
    sup_core::paths::state_dir().join("sup.log")
}

/// Builds the filter: `SUP_LOG`, else `config_level`, else `info`.
fn env_filter(config_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(config_level.unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber writing to `path`.
///
/// If the directory or file cannot be opened, logging stays disabled and the
/// program carries on; there is nowhere useful to report it.
pub fn init(path: &Path, config_level: Option<&str>) {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let log_file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
    {
        Ok(f) => f,
        Err(_) => return,
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config_level))
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file))
        .try_init();
}
