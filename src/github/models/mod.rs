//! Data models representing pull request information and commits.
//!
//! This module contains the stable records handed to callers. The raw
//! GraphQL response shapes live in [`api`] and are converted by
//! [`crate::github::normalize`], which validates every enum-valued field
//! against the closed sets below.

pub(crate) mod api;

use serde::Serialize;

/// Pull request lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestState {
    /// Closed without merging.
    Closed,
    /// Merged into its base branch.
    Merged,
    /// Still open.
    Open,
}

impl PullRequestState {
    /// Parses the GraphQL enum value.
    #[must_use]
    pub fn from_graphql(value: &str) -> Option<Self> {
        match value {
            "CLOSED" => Some(Self::Closed),
            "MERGED" => Some(Self::Merged),
            "OPEN" => Some(Self::Open),
            _ => None,
        }
    }

    /// GraphQL spelling of the value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "CLOSED",
            Self::Merged => "MERGED",
            Self::Open => "OPEN",
        }
    }
}

/// GitHub's computed conflict status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MergeableState {
    /// The head cannot be merged cleanly.
    Conflicting,
    /// The head merges cleanly.
    Mergeable,
    /// GitHub has not finished computing mergeability.
    Unknown,
}

impl MergeableState {
    /// Parses the GraphQL enum value.
    #[must_use]
    pub fn from_graphql(value: &str) -> Option<Self> {
        match value {
            "CONFLICTING" => Some(Self::Conflicting),
            "MERGEABLE" => Some(Self::Mergeable),
            "UNKNOWN" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// GraphQL spelling of the value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Conflicting => "CONFLICTING",
            Self::Mergeable => "MERGEABLE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// GitHub's extended merge readiness classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MergeStateStatus {
    /// Head is out of date with the base.
    Behind,
    /// Blocked by branch protection.
    Blocked,
    /// Mergeable with passing commit status.
    Clean,
    /// Merge commit cannot be cleanly created.
    Dirty,
    /// Draft pull request.
    Draft,
    /// Mergeable with passing status and pre-receive hooks.
    HasHooks,
    /// State cannot currently be determined.
    Unknown,
    /// Mergeable with non-passing commit status.
    Unstable,
}

impl MergeStateStatus {
    /// Parses the GraphQL enum value.
    #[must_use]
    pub fn from_graphql(value: &str) -> Option<Self> {
        match value {
            "BEHIND" => Some(Self::Behind),
            "BLOCKED" => Some(Self::Blocked),
            "CLEAN" => Some(Self::Clean),
            "DIRTY" => Some(Self::Dirty),
            "DRAFT" => Some(Self::Draft),
            "HAS_HOOKS" => Some(Self::HasHooks),
            "UNKNOWN" => Some(Self::Unknown),
            "UNSTABLE" => Some(Self::Unstable),
            _ => None,
        }
    }

    /// GraphQL spelling of the value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Behind => "BEHIND",
            Self::Blocked => "BLOCKED",
            Self::Clean => "CLEAN",
            Self::Dirty => "DIRTY",
            Self::Draft => "DRAFT",
            Self::HasHooks => "HAS_HOOKS",
            Self::Unknown => "UNKNOWN",
            Self::Unstable => "UNSTABLE",
        }
    }
}

/// State of a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// Approved the changes.
    Approved,
    /// Requested changes.
    ChangesRequested,
    /// Commented without a verdict.
    Commented,
    /// A previous verdict was dismissed.
    Dismissed,
    /// Review not yet submitted.
    Pending,
}

impl ReviewState {
    /// Parses the GraphQL enum value.
    #[must_use]
    pub fn from_graphql(value: &str) -> Option<Self> {
        match value {
            "APPROVED" => Some(Self::Approved),
            "CHANGES_REQUESTED" => Some(Self::ChangesRequested),
            "COMMENTED" => Some(Self::Commented),
            "DISMISSED" => Some(Self::Dismissed),
            "PENDING" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// A review attached to a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReviewEdge {
    /// Review verdict.
    pub state: ReviewState,
}

/// Stable pull request record assembled from a GraphQL response.
///
/// `merged == true` always comes with [`PullRequestState::Merged`]; the
/// normaliser rejects responses that break this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestInformation {
    /// Author login; absent when the account was deleted.
    pub author_login: Option<String>,
    /// Full message of the head commit.
    pub commit_message: String,
    /// First line of the head commit message.
    pub commit_message_headline: String,
    /// Extended readiness, absent when GitHub does not report one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_state_status: Option<MergeStateStatus>,
    /// Conflict status.
    pub mergeable_state: MergeableState,
    /// Whether the pull request has been merged.
    pub merged: bool,
    /// GraphQL node identifier.
    pub pull_request_id: String,
    /// Pull request number.
    pub pull_request_number: u64,
    /// Lifecycle state.
    pub pull_request_state: PullRequestState,
    /// Title.
    pub pull_request_title: String,
    /// Repository name the pull request was looked up in.
    pub repository_name: String,
    /// Repository owner the pull request was looked up in.
    pub repository_owner: String,
    /// Review edges in server order. `None` marks an edge whose node was
    /// withheld, so the length always matches the raw edge count.
    pub review_edges: Vec<Option<ReviewEdge>>,
}

impl PullRequestInformation {
    /// Iterates over the reviews that were visible.
    pub fn visible_reviews(&self) -> impl Iterator<Item = ReviewState> + '_ {
        self.review_edges.iter().flatten().map(|edge| edge.state)
    }
}

/// One commit of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitNode {
    /// Login of the GitHub user linked to the commit author, if any.
    pub author_login: Option<String>,
    /// Signature validity; `None` means the commit is unsigned.
    pub signature_valid: Option<bool>,
}

impl CommitNode {
    /// True when the commit carries a signature, valid or not.
    #[must_use]
    pub const fn is_signed(&self) -> bool {
        self.signature_valid.is_some()
    }
}
