//! `gh api graphql` implementation of [`PrSource`].

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use sup_core::source::{graphql_query, PrSource, SearchScope};
use sup_core::types::Record;
use sup_core::{wire, FetchError};

/// Overrides the `gh` binary, e.g. for a wrapper script.
const ENV_GH_BIN: &str = "SUP_GH_BIN";

/// Runs the PR search through the user's authenticated `gh` CLI.
#[derive(Debug, Clone)]
pub struct GhCli {
    binary: PathBuf,
}

impl GhCli {
    pub fn new() -> Self {
        let binary = std::env::var_os(ENV_GH_BIN)
            .filter(|b| !b.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("gh"));
        Self { binary }
    }

    /// Arguments passed to `gh` for `scope`.
    fn search_args(scope: &SearchScope) -> Vec<OsString> {
        vec![
            OsString::from("api"),
            OsString::from("graphql"),
            OsString::from("-f"),
            OsString::from(format!("query={}", graphql_query(scope))),
        ]
    }
}

impl Default for GhCli {
    fn default() -> Self {
        Self::new()
    }
}

impl PrSource for GhCli {
    fn fetch(&self, scope: &SearchScope) -> Result<Vec<Record>, FetchError> {
        tracing::debug!(query = %scope.search_query(), "running gh search");
        let output = Command::new(&self.binary)
            .args(Self::search_args(scope))
            .output()
            .map_err(|e| FetchError::new(format!("failed to fetch PRs: {e}")))?;

        if !output.status.success() {
            let detail = one_line(&String::from_utf8_lossy(&output.stderr))
                .unwrap_or_else(|| output.status.to_string());
            return Err(FetchError::new(format!("failed to fetch PRs: {detail}")));
        }

        let records = wire::parse_search_response(&output.stdout)?;
        tracing::debug!(count = records.len(), "gh search finished");
        Ok(records)
    }
}

/// Folds multi-line `gh` stderr into a single line for the status footer.
fn one_line(stderr: &str) -> Option<String> {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    (!lines.is_empty()).then(|| lines.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_args_carry_graphql_document() {
        let args = GhCli::search_args(&SearchScope::Organizations(vec!["acme".into()]));
        assert_eq!(
            args[..3],
            [
                OsString::from("api"),
                OsString::from("graphql"),
                OsString::from("-f")
            ]
        );
        let query = args[3].to_string_lossy();
        assert!(query.starts_with("query={"));
        assert!(query.contains("org:acme is:pr is:open"));
    }

    #[test]
    fn stderr_is_folded_to_one_line() {
        let stderr = "To get started with GitHub CLI, please run:  gh auth login\n\
                      Alternatively, populate the GH_TOKEN environment variable.\n\n";
        assert_eq!(
            one_line(stderr).as_deref(),
            Some(
                "To get started with GitHub CLI, please run:  gh auth login; \
                 Alternatively, populate the GH_TOKEN environment variable."
            )
        );
        assert_eq!(one_line(" \n\n"), None);
    }

    #[test]
    fn missing_binary_is_a_fetch_error() {
        let gh = GhCli {
            binary: PathBuf::from("/nonexistent/sup-test-gh"),
        };
        let err = gh.fetch(&SearchScope::Involving).unwrap_err();
        assert!(err.message().starts_with("failed to fetch PRs:"));
    }
}
