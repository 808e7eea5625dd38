//! GraphQL response shapes returned by `gh api graphql` for the PR search.
//!
//! These structs mirror the JSON exactly and are converted into [`Record`]s
//! immediately; nothing outside this module sees them. Missing objects
//! (deleted authors, PRs without reviews) deserialize to defaults.

use serde::Deserialize;

use crate::error::{FetchError, Result};
use crate::types::{Record, Review, ReviewDecision, ReviewState};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Login {
    login: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RequestedReviewer {
    /// Set when a user was requested.
    login: String,
    /// Set when a team was requested.
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ReviewRequestNode {
    requested_reviewer: Option<RequestedReviewer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ReviewRequests {
    nodes: Vec<ReviewRequestNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReviewNode {
    author: Option<Login>,
    state: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Reviews {
    nodes: Vec<ReviewNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Repository {
    name: String,
    owner: Login,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PullRequestNode {
    number: u64,
    title: String,
    head_ref_name: String,
    is_draft: bool,
    additions: u64,
    deletions: u64,
    author: Option<Login>,
    repository: Repository,
    review_decision: Option<String>,
    review_requests: Option<ReviewRequests>,
    reviews: Option<Reviews>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Search {
    nodes: Vec<PullRequestNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchData {
    search: Search,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Response {
    data: Option<SearchData>,
    errors: Vec<GraphqlError>,
}

fn decision(raw: Option<&str>) -> ReviewDecision {
    match raw {
        None | Some("") => ReviewDecision::None,
        Some("APPROVED") => ReviewDecision::Approved,
        Some("CHANGES_REQUESTED") => ReviewDecision::ChangesRequested,
        Some("REVIEW_REQUIRED") => ReviewDecision::ReviewRequired,
        Some(_) => ReviewDecision::Unresolved,
    }
}

fn review_state(raw: &str) -> ReviewState {
    match raw {
        "APPROVED" => ReviewState::Approved,
        "CHANGES_REQUESTED" => ReviewState::ChangesRequested,
        "COMMENTED" => ReviewState::Commented,
        _ => ReviewState::Other,
    }
}

impl From<PullRequestNode> for Record {
    fn from(node: PullRequestNode) -> Self {
        let review_requests = node
            .review_requests
            .map(|rr| {
                rr.nodes
                    .into_iter()
                    .filter_map(|n| n.requested_reviewer)
                    .map(|r| if r.login.is_empty() { r.name } else { r.login })
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let reviews = node
            .reviews
            .map(|r| {
                r.nodes
                    .into_iter()
                    .map(|n| Review {
                        author: n.author.map(|a| a.login).unwrap_or_default(),
                        state: review_state(&n.state),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Record {
            number: node.number,
            repo: node.repository.name,
            owner: node.repository.owner.login,
            title: node.title,
            branch: node.head_ref_name,
            is_draft: node.is_draft,
            additions: node.additions,
            deletions: node.deletions,
            author: node.author.map(|a| a.login).unwrap_or_default(),
            review_decision: decision(node.review_decision.as_deref()),
            review_requests,
            reviews,
        }
    }
}

/// Parses the raw stdout of the search query into records.
///
/// Search results that are not pull requests come back as empty objects and
/// are dropped. A response carrying GraphQL `errors` and no data is a failure.
///
/// # Errors
///
/// Returns [`crate::Error::Json`] for malformed JSON and
/// [`crate::Error::Fetch`] when GitHub reported errors instead of data.
pub fn parse_search_response(raw: &[u8]) -> Result<Vec<Record>> {
    let response: Response = serde_json::from_slice(raw)?;
    match response.data {
        Some(data) => Ok(data
            .search
            .nodes
            .into_iter()
            .filter(|n| n.number > 0)
            .map(Record::from)
            .collect()),
        None => {
            let message = response
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            Err(FetchError::new(format!("failed to fetch PRs: {message}")).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
      "data": {
        "search": {
          "nodes": [
            {
              "number": 156,
              "title": "Add PostgreSQL connection pooling",
              "headRefName": "feature/pg-pool",
              "isDraft": false,
              "additions": 178,
              "deletions": 45,
              "author": {"login": "chris"},
              "repository": {"name": "data-service", "owner": {"login": "acme-corp"}},
              "reviewDecision": "REVIEW_REQUIRED",
              "reviewRequests": {"totalCount": 1, "nodes": [{"requestedReviewer": {"name": "platform-team"}}]},
              "reviews": {"nodes": [{"author": {"login": "alex"}, "state": "COMMENTED"}]}
            },
            {},
            {
              "number": 203,
              "title": "Upgrade toolchain",
              "headRefName": "chore/upgrade",
              "isDraft": true,
              "additions": 23,
              "deletions": 19,
              "author": null,
              "repository": {"name": "cli-tools", "owner": {"login": "acme-corp"}},
              "reviewDecision": null,
              "reviewRequests": {"totalCount": 0, "nodes": []},
              "reviews": {"nodes": []}
            }
          ]
        }
      }
    }"#;

    #[test]
    fn parses_pull_requests_and_skips_other_results() {
        let records = parse_search_response(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.key(), ("acme-corp", "data-service", 156));
        assert_eq!(first.review_decision, ReviewDecision::ReviewRequired);
        assert_eq!(first.review_requests, vec!["platform-team".to_owned()]);
        assert_eq!(first.reviews[0].state, ReviewState::Commented);

        let second = &records[1];
        assert!(second.is_draft);
        assert_eq!(second.author, "");
        assert_eq!(second.review_decision, ReviewDecision::None);
    }

    #[test]
    fn graphql_errors_become_fetch_failures() {
        let raw = br#"{"errors": [{"message": "Bad credentials"}]}"#;
        let err = parse_search_response(raw).unwrap_err();
        assert!(err.to_string().contains("Bad credentials"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_search_response(b"not json").is_err());
    }
}
