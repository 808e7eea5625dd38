//! XDG base-directory resolution for sup's config, cache, and log files.
//!
//! Each helper prefers the XDG environment variable and falls back to the
//! conventional directory under `$HOME`; with neither set, a relative path is
//! returned so callers still have somewhere to look.

use std::path::PathBuf;

const APP_DIR: &str = "sup";

fn xdg_dir(var: &str, home_fallback: &str) -> PathBuf {
    let base = std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(home_fallback))
        })
        .unwrap_or_else(|| PathBuf::from(home_fallback));
    base.join(APP_DIR)
}

/// `$XDG_CONFIG_HOME/sup`, else `~/.config/sup`.
pub fn config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

/// `$XDG_CACHE_HOME/sup`, else `~/.cache/sup`.
pub fn cache_dir() -> PathBuf {
    xdg_dir("XDG_CACHE_HOME", ".cache")
}

/// `$XDG_STATE_HOME/sup`, else `~/.local/state/sup`.
pub fn state_dir() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state")
}

/// The user's home directory, if `$HOME` is set.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().filter(|h| !h.is_empty()).map(PathBuf::from)
}
