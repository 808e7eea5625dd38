//! On-disk cache of the last fetched PR list.
//!
//! A single JSON document at `$XDG_CACHE_HOME/sup/prs.json`. It is written
//! after every successful fetch and read once at startup.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::Record;

/// Last-fetched record list, persisted as JSON between runs.
///
/// The cache is advisory: it only lets the dashboard paint something before
/// the first fetch returns. A missing or unreadable file is the same as an
/// empty cache, and callers ignore save failures.
#[derive(Debug, Clone)]
pub struct Cache {
    path: PathBuf,
}

impl Cache {
    /// Cache stored at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cache at `$XDG_CACHE_HOME/sup/prs.json`.
    pub fn at_default_location() -> Self {
        Self::new(crate::paths::cache_dir().join("prs.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cached records.
    ///
    /// Returns `None` when the file is absent, unreadable, or does not parse.
    pub fn load(&self) -> Option<Vec<Record>> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "no PR cache");
                return None;
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(records) => Some(records),
            Err(e) => {
                tracing::debug!(
                    path = %self.path.display(),
                    error = %e,
                    "ignoring unparsable PR cache"
                );
                None
            }
        }
    }

    /// Overwrites the cache with `records`, creating the parent directory.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error`] if the directory or file cannot be written.
    pub fn save(&self, records: &[Record]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_vec(records)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }
}
