//! Fetch gateway contract.
//!
//! A [`PrSource`] turns a [`SearchScope`] into the list of open pull requests
//! it covers. Implementations block; the binary runs them on a worker thread
//! and only observes the finished result. [`DemoSource`] serves a fixed list
//! for screenshots and offline runs.

use crate::error::FetchError;
use crate::types::{Record, Review, ReviewDecision, ReviewState};

/// Which pull requests to list. Both scopes are limited to open PRs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchScope {
    /// PRs involving the authenticated user (`involves:@me`).
    Involving,
    /// PRs in any of the named organizations.
    Organizations(Vec<String>),
}

impl SearchScope {
    /// GitHub search syntax for this scope.
    pub fn search_query(&self) -> String {
        match self {
            SearchScope::Involving => "involves:@me is:pr is:open".to_owned(),
            SearchScope::Organizations(orgs) => {
                let mut parts: Vec<String> = orgs.iter().map(|o| format!("org:{o}")).collect();
                parts.push("is:pr is:open".to_owned());
                parts.join(" ")
            }
        }
    }
}

/// Number of search results requested per fetch.
pub const PAGE_SIZE: u32 = 100;

/// GraphQL document for the PR search.
///
/// Only the primary review request and the latest review are requested; that
/// is all the dashboard shows.
pub fn graphql_query(scope: &SearchScope) -> String {
    format!(
        r#"{{
  search(query: "{query}", type: ISSUE, first: {PAGE_SIZE}) {{
    nodes {{
      ... on PullRequest {{
        number
        title
        headRefName
        isDraft
        additions
        deletions
        author {{ login }}
        repository {{ name owner {{ login }} }}
        reviewDecision
        reviewRequests(first: 1) {{ totalCount nodes {{ requestedReviewer {{ ... on User {{ login }} ... on Team {{ name }} }} }} }}
        reviews(last: 1) {{ nodes {{ author {{ login }} state }} }}
      }}
    }}
  }}
}}"#,
        query = escape_graphql_string(&scope.search_query())
    )
}

/// Escapes `raw` for use inside a GraphQL string literal.
fn escape_graphql_string(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Something that can list open pull requests.
pub trait PrSource: Send {
    /// Runs the query. May block for the duration of a network round-trip.
    fn fetch(&self, scope: &SearchScope) -> Result<Vec<Record>, FetchError>;
}

/// Fixed, offline record list.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoSource;

impl PrSource for DemoSource {
    fn fetch(&self, _scope: &SearchScope) -> Result<Vec<Record>, FetchError> {
        Ok(demo_records())
    }
}

#[allow(clippy::too_many_arguments)]
fn demo(
    number: u64,
    repo: &str,
    title: &str,
    branch: &str,
    is_draft: bool,
    (additions, deletions): (u64, u64),
    author: &str,
    review_decision: ReviewDecision,
    review_requests: &[&str],
    reviews: &[(&str, ReviewState)],
) -> Record {
    Record {
        number,
        repo: repo.to_owned(),
        owner: "acme-corp".to_owned(),
        title: title.to_owned(),
        branch: branch.to_owned(),
        is_draft,
        additions,
        deletions,
        author: author.to_owned(),
        review_decision,
        review_requests: review_requests.iter().map(|s| (*s).to_owned()).collect(),
        reviews: reviews
            .iter()
            .map(|(author, state)| Review {
                author: (*author).to_owned(),
                state: *state,
            })
            .collect(),
    }
}

/// The eight PRs shown in demo mode, in no particular order.
pub fn demo_records() -> Vec<Record> {
    use ReviewDecision as D;
    use ReviewState as S;
    vec![
        demo(
            142,
            "backend-api",
            "Add user authentication flow",
            "feature/auth-flow",
            false,
            (847, 123),
            "sarah",
            D::Approved,
            &[],
            &[("mike", S::Approved)],
        ),
        demo(
            287,
            "job-runner",
            "Fix memory leak in worker pool",
            "fix/worker-memory",
            false,
            (34, 89),
            "alex",
            D::ChangesRequested,
            &[],
            &[("sarah", S::ChangesRequested)],
        ),
        demo(
            91,
            "web-app",
            "Update dashboard metrics components",
            "feature/metrics-v2",
            false,
            (456, 201),
            "mike",
            D::ReviewRequired,
            &["alex"],
            &[],
        ),
        demo(
            445,
            "backend-api",
            "Implement rate limiting middleware",
            "feature/rate-limit",
            true,
            (234, 12),
            "jordan",
            D::None,
            &[],
            &[],
        ),
        demo(
            156,
            "data-service",
            "Add PostgreSQL connection pooling",
            "feature/pg-pool",
            false,
            (178, 45),
            "chris",
            D::ReviewRequired,
            &["jordan"],
            &[("alex", S::Commented)],
        ),
        demo(
            312,
            "backend-api",
            "Refactor notification service",
            "refactor/notifications",
            false,
            (623, 891),
            "taylor",
            D::Approved,
            &[],
            &[("chris", S::Approved)],
        ),
        demo(
            78,
            "web-app",
            "Add dark mode support",
            "feature/dark-mode",
            false,
            (567, 234),
            "sam",
            D::ReviewRequired,
            &["taylor"],
            &[],
        ),
        demo(
            203,
            "cli-tools",
            "Upgrade to Go 1.22",
            "chore/go-upgrade",
            true,
            (23, 19),
            "alex",
            D::None,
            &[],
            &[],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn involving_scope_query() {
        assert_eq!(SearchScope::Involving.search_query(), "involves:@me is:pr is:open");
    }

    #[test]
    fn organization_scope_lists_each_org() {
        let scope = SearchScope::Organizations(vec!["acme".into(), "globex".into()]);
        assert_eq!(scope.search_query(), "org:acme org:globex is:pr is:open");
    }

    #[test]
    fn graphql_query_embeds_search() {
        let q = graphql_query(&SearchScope::Involving);
        assert!(q.contains(
            r#"search(query: "involves:@me is:pr is:open", type: ISSUE, first: 100)"#
        ));
        assert!(q.contains("reviews(last: 1)"));
    }

    #[test]
    fn graphql_query_escapes_backslash_and_quote() {
        let scope = SearchScope::Organizations(vec![r#"a\b"c"#.into()]);
        let q = graphql_query(&scope);
        assert!(q.contains(r#"search(query: "org:a\\b\"c is:pr is:open""#));
    }

    #[test]
    fn demo_source_serves_eight_records() {
        let records = DemoSource.fetch(&SearchScope::Involving).unwrap();
        assert_eq!(records.len(), 8);
        assert_eq!(records.iter().filter(|r| r.is_draft).count(), 2);
    }
}
