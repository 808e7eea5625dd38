//! User configuration loaded from `$XDG_CONFIG_HOME/sup/config.toml`.
//!
//! Every key is optional. Command-line flags and environment variables win
//! over anything set here.
//!
//! ```toml
//! theme = "dark"
//! orgs = ["acme-corp"]
//! dev_dir = "~/src"
//! refresh_interval_secs = 300
//! log_level = "debug"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Longest background refresh period; larger settings are clamped to it.
pub const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Contents of `config.toml`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Theme name; `--theme` overrides it.
    pub theme: Option<String>,
    /// Organizations to search when neither `--org` nor `SUP_ORG` is set.
    pub orgs: Vec<String>,
    /// Directory searched first for local clones. A leading `~/` is expanded.
    pub dev_dir: Option<PathBuf>,
    /// Seconds between background refreshes; 0 disables them. Capped at
    /// [`MAX_REFRESH_INTERVAL`].
    pub refresh_interval_secs: u64,
    /// `tracing` filter directive used when `SUP_LOG` is unset.
    pub log_level: Option<String>,
}

impl Config {
    /// Path of the config file.
    pub fn path() -> PathBuf {
        sup_core::paths::config_dir().join("config.toml")
    }

    /// Parses config text.
    ///
    /// # Errors
    ///
    /// Returns the `toml` error for malformed input or unknown keys.
    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Loads the config at `path`.
    ///
    /// A missing file yields the defaults. A file that does not parse also
    /// yields the defaults, after a warning on stderr: the terminal is not in
    /// raw mode yet, so the user sees it.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(_) => return Self::default(),
        };
        match Self::parse(&raw) {
            Ok(mut config) => {
                if config.refresh_interval_secs > MAX_REFRESH_INTERVAL.as_secs() {
                    eprintln!(
                        "sup: refresh_interval_secs in {} is above {}, using {}",
                        path.display(),
                        MAX_REFRESH_INTERVAL.as_secs(),
                        MAX_REFRESH_INTERVAL.as_secs()
                    );
                }
                config.dev_dir = config.dev_dir.map(|d| expand_home(&d));
                config
            }
            Err(e) => {
                eprintln!("sup: config parse error in {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Periodic refresh period, if enabled.
    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_secs > 0)
            .then(|| Duration::from_secs(self.refresh_interval_secs).min(MAX_REFRESH_INTERVAL))
    }
}

/// Expands a leading `~/` against `$HOME`.
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), sup_core::paths::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.refresh_interval(), None);
    }

    #[test]
    fn full_file_parses() {
        let config = Config::parse(
            r#"
            theme = "classic"
            orgs = ["acme-corp", "globex"]
            dev_dir = "/work"
            refresh_interval_secs = 120
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.theme.as_deref(), Some("classic"));
        assert_eq!(config.orgs, vec!["acme-corp", "globex"]);
        assert_eq!(config.dev_dir, Some(PathBuf::from("/work")));
        assert_eq!(config.refresh_interval(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn huge_refresh_interval_is_clamped() {
        let config = Config {
            refresh_interval_secs: u64::MAX,
            ..Config::default()
        };
        assert_eq!(config.refresh_interval(), Some(MAX_REFRESH_INTERVAL));
        assert!(std::time::Instant::now()
            .checked_add(MAX_REFRESH_INTERVAL)
            .is_some());
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(Config::parse("colour = \"red\"").is_err());
    }

    #[test]
    fn load_falls_back_on_bad_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(Config::load(&path), Config::default());

        std::fs::write(&path, "orgs = 3").unwrap();
        assert_eq!(Config::load(&path), Config::default());

        std::fs::write(&path, "orgs = [\"acme\"]").unwrap();
        assert_eq!(Config::load(&path).orgs, vec!["acme"]);
    }

    #[test]
    fn absolute_dev_dir_is_left_alone() {
        assert_eq!(expand_home(Path::new("/src")), PathBuf::from("/src"));
    }
}
