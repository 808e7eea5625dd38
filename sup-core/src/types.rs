//! Pull request data model.
//!
//! These types are owned and `Send`: the fetch worker builds them on its own
//! thread and hands the finished list to the session. They also serialize
//! directly as the cache format.

use serde::{Deserialize, Serialize};

/// Aggregate review decision GitHub reports for a pull request.
///
/// `None` means GitHub returned no decision (no branch protection asks for
/// one); `Unresolved` covers any value this version does not recognise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewDecision {
    Unresolved,
    Approved,
    ChangesRequested,
    ReviewRequired,
    #[default]
    None,
}

/// Outcome of a single submitted review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Other,
}

/// One submitted review on a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Login of the reviewer.
    pub author: String,
    /// What the review concluded.
    pub state: ReviewState,
}

/// One open pull request, as listed on the dashboard.
///
/// Records are never edited after construction: a refresh swaps the whole list.
/// `reviews` is ordered oldest first, so the most recent review is last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// PR number, unique only within `owner/repo`.
    pub number: u64,
    /// Repository name without the owner.
    pub repo: String,
    /// User or organization that owns the repository.
    pub owner: String,
    pub title: String,
    /// Head branch name.
    pub branch: String,
    pub is_draft: bool,
    /// Lines added across the PR.
    pub additions: u64,
    /// Lines removed across the PR.
    pub deletions: u64,
    /// Login of the PR author.
    pub author: String,
    /// Aggregate decision; absent in older cache files.
    #[serde(default)]
    pub review_decision: ReviewDecision,
    /// Pending reviewer requests; the first entry is the primary one.
    #[serde(default)]
    pub review_requests: Vec<String>,
    /// Submitted reviews, oldest first.
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// Status category shown in the first column of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Badge {
    Draft,
    Approved,
    Denied,
    Commented,
    Review,
    Open,
}

impl Badge {
    /// Bracketed label rendered in the status column.
    pub fn label(self) -> &'static str {
        match self {
            Badge::Draft => "[Draft]",
            Badge::Approved => "[Approved]",
            Badge::Denied => "[Denied]",
            Badge::Commented => "[Commented]",
            Badge::Review => "[Review]",
            Badge::Open => "[Open]",
        }
    }
}

impl Record {
    /// Identity across fetches: PR numbers are only unique per repository.
    pub fn key(&self) -> (&str, &str, u64) {
        (&self.owner, &self.repo, self.number)
    }

    /// Web URL of the pull request.
    pub fn url(&self) -> String {
        format!(
            "https://github.com/{}/{}/pull/{}",
            self.owner, self.repo, self.number
        )
    }

    /// `owner/repo`, as `gh` expects for `--repo`.
    pub fn full_repo_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Most recent submitted review, if any.
    pub fn latest_review(&self) -> Option<&Review> {
        self.reviews.last()
    }

    /// Classifies the record for the status column.
    ///
    /// Drafts always show as drafts. A review-required PR whose latest review
    /// is only a comment shows as `Commented` so discussion is visible.
    pub fn badge(&self) -> Badge {
        if self.is_draft {
            return Badge::Draft;
        }
        match self.review_decision {
            ReviewDecision::Approved => Badge::Approved,
            ReviewDecision::ChangesRequested => Badge::Denied,
            ReviewDecision::ReviewRequired => match self.latest_review() {
                Some(r) if r.state == ReviewState::Commented => Badge::Commented,
                _ => Badge::Review,
            },
            ReviewDecision::Unresolved | ReviewDecision::None => Badge::Open,
        }
    }

    /// The reviewer worth showing: the first pending request, else whoever
    /// reviewed last, else empty.
    pub fn relevant_reviewer(&self) -> &str {
        self.review_requests
            .iter()
            .find(|r| !r.is_empty())
            .map(String::as_str)
            .or_else(|| self.latest_review().map(|r| r.author.as_str()))
            .unwrap_or("")
    }

    /// Lower-cased text the filter engine searches.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.repo, self.title, self.author, self.branch
        )
        .to_lowercase()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Minimal open record for tests; adjust fields with struct update syntax.
    pub fn record(number: u64, repo: &str, title: &str) -> Record {
        Record {
            number,
            repo: repo.to_owned(),
            owner: "acme-corp".to_owned(),
            title: title.to_owned(),
            branch: format!("feature/{number}"),
            is_draft: false,
            additions: 10,
            deletions: 2,
            author: "sarah".to_owned(),
            review_decision: ReviewDecision::None,
            review_requests: Vec::new(),
            reviews: Vec::new(),
        }
    }
}
