//! End-of-session action for a committed selection.
//!
//! Runs after the terminal is restored: find the local clone of the selected
//! PR's repository, then either check the PR out with `gh pr checkout` or,
//! with `--cd`, write the clone's path for a shell wrapper to `cd` into.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use git2::Repository;
use sup_core::types::Record;
use thiserror::Error;

/// Directories under `$HOME` searched for clones, in order. The empty entry
/// is `$HOME` itself.
const DEV_DIRS: &[&str] = &[
    "Development",
    "dev",
    "projects",
    "code",
    "src",
    "repos",
    "github",
    "git",
    "",
];

/// File `--cd` writes the repository path to, inside the temp dir.
pub const CD_PATH_FILE: &str = "sup_cd_path";

/// Failures of the end-of-session action. Each maps to exit status 1.
#[derive(Debug, Error)]
pub enum ExitError {
    #[error(
        "Repo '{name}' not found in common locations.\n\
         Clone it: gh repo clone {owner}/{name}\n\
         Or set SUP_DEV_DIR to your repos directory."
    )]
    RepoNotFound { owner: String, name: String },

    #[error("failed to run gh: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("checkout failed: gh exited with {0}")]
    CheckoutFailed(ExitStatus),

    #[error("failed to write {}: {source}", path.display())]
    WritePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Candidate clone locations for `name`, most specific first.
fn candidates(name: &str, dev_dir: Option<&Path>, home: Option<&Path>) -> Vec<PathBuf> {
    let mut out = Vec::new();
    if let Some(dir) = dev_dir {
        out.push(dir.join(name));
    }
    if let Some(home) = home {
        out.extend(DEV_DIRS.iter().map(|d| home.join(d).join(name)));
    }
    out
}

/// Finds a local git clone of the repository `name`.
///
/// Looks in `dev_dir` first, then the usual places under `home`. Only
/// directories that open as git repositories count.
pub fn find_repo_path(name: &str, dev_dir: Option<&Path>, home: Option<&Path>) -> Option<PathBuf> {
    candidates(name, dev_dir, home).into_iter().find(|path| {
        let found = path.is_dir() && Repository::open(path).is_ok();
        tracing::trace!(path = %path.display(), found, "probing for clone");
        found
    })
}

/// Locates the clone for `record` or explains how to get one.
///
/// # Errors
///
/// Returns [`ExitError::RepoNotFound`] when no candidate directory is a git
/// repository.
pub fn locate(record: &Record, dev_dir: Option<&Path>) -> Result<PathBuf, ExitError> {
    let home = sup_core::paths::home_dir();
    find_repo_path(&record.repo, dev_dir, home.as_deref()).ok_or_else(|| ExitError::RepoNotFound {
        owner: record.owner.clone(),
        name: record.repo.clone(),
    })
}

/// Arguments for `gh` that check out `record` from its own repository.
fn checkout_args(record: &Record) -> Vec<String> {
    vec![
        "pr".to_owned(),
        "checkout".to_owned(),
        record.number.to_string(),
        "--repo".to_owned(),
        record.full_repo_name(),
        "--force".to_owned(),
    ]
}

/// Runs `gh pr checkout <number> --repo <owner/repo> --force` inside
/// `repo_path`, inheriting the terminal so `gh` can prompt and report progress.
///
/// # Errors
///
/// Returns [`ExitError::Spawn`] if `gh` cannot be started and
/// [`ExitError::CheckoutFailed`] if it exits unsuccessfully.
pub fn checkout(record: &Record, repo_path: &Path) -> Result<(), ExitError> {
    eprintln!("Checking out PR #{} in {}...", record.number, repo_path.display());
    tracing::info!(pr = record.number, path = %repo_path.display(), "checking out");
    let status = Command::new("gh")
        .args(checkout_args(record))
        .current_dir(repo_path)
        .status()
        .map_err(ExitError::Spawn)?;
    if status.success() {
        Ok(())
    } else {
        Err(ExitError::CheckoutFailed(status))
    }
}

/// Default location of the `--cd` path file.
pub fn cd_path_file() -> PathBuf {
    std::env::temp_dir().join(CD_PATH_FILE)
}

/// Writes `repo_path` to `target` for a shell wrapper to pick up.
///
/// # Errors
///
/// Returns [`ExitError::WritePath`] if the file cannot be written.
pub fn write_cd_path(repo_path: &Path, target: &Path) -> Result<(), ExitError> {
    std::fs::write(target, repo_path.to_string_lossy().as_bytes()).map_err(|source| {
        ExitError::WritePath {
            path: target.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sup_core::source::demo_records;

    #[test]
    fn explicit_dev_dir_wins() {
        let dev = tempfile::TempDir::new().unwrap();
        let home = tempfile::TempDir::new().unwrap();
        Repository::init(dev.path().join("backend-api")).unwrap();
        Repository::init(home.path().join("src").join("backend-api")).unwrap();

        let found = find_repo_path("backend-api", Some(dev.path()), Some(home.path()));
        assert_eq!(found, Some(dev.path().join("backend-api")));
    }

    #[test]
    fn searches_common_directories_in_order() {
        let home = tempfile::TempDir::new().unwrap();
        Repository::init(home.path().join("repos").join("web-app")).unwrap();
        Repository::init(home.path().join("web-app")).unwrap();

        let found = find_repo_path("web-app", None, Some(home.path()));
        assert_eq!(found, Some(home.path().join("repos").join("web-app")));
    }

    #[test]
    fn plain_directory_is_not_a_clone() {
        let home = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(home.path().join("code").join("cli-tools")).unwrap();

        assert_eq!(find_repo_path("cli-tools", None, Some(home.path())), None);
    }

    #[test]
    fn checkout_targets_the_records_repository() {
        let record = &demo_records()[0];
        assert_eq!(
            checkout_args(record),
            [
                "pr",
                "checkout",
                "142",
                "--repo",
                "acme-corp/backend-api",
                "--force"
            ]
        );
    }

    #[test]
    fn not_found_message_explains_remedy() {
        let record = &demo_records()[0];
        let err = ExitError::RepoNotFound {
            owner: record.owner.clone(),
            name: record.repo.clone(),
        };
        let text = err.to_string();
        assert!(text.starts_with("Repo 'backend-api' not found in common locations."));
        assert!(text.contains("gh repo clone acme-corp/backend-api"));
        assert!(text.contains("SUP_DEV_DIR"));
    }

    #[test]
    fn cd_path_is_written_verbatim() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join(CD_PATH_FILE);
        write_cd_path(Path::new("/home/me/src/web-app"), &target).unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "/home/me/src/web-app");
    }

    #[test]
    fn cd_path_write_failure_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("missing").join(CD_PATH_FILE);
        let err = write_cd_path(Path::new("/x"), &target).unwrap_err();
        assert!(matches!(err, ExitError::WritePath { .. }));
    }
}
