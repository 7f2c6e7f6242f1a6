//! Deserialisation targets mirroring the GraphQL response shapes.
//!
//! Enum-valued fields stay as strings here so that the normaliser can report
//! unrecognised values instead of failing inside serde.

use serde::Deserialize;
use serde_json::Value;

use crate::github::pagination::PageInfo;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiActor {
    pub(crate) login: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiCommitMessage {
    pub(crate) message: String,
    pub(crate) message_headline: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCommitMessageNode {
    pub(crate) commit: ApiCommitMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCommitMessageEdge {
    pub(crate) node: Option<ApiCommitMessageNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCommitHistory {
    #[serde(default)]
    pub(crate) edges: Vec<Option<ApiCommitMessageEdge>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiReview {
    pub(crate) state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiReviewEdge {
    pub(crate) node: Option<ApiReview>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiReviews {
    #[serde(default)]
    pub(crate) edges: Option<Vec<Option<ApiReviewEdge>>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiPullRequest {
    pub(crate) author: Option<ApiActor>,
    pub(crate) commits: ApiCommitHistory,
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) merge_state_status: Option<String>,
    pub(crate) mergeable: String,
    pub(crate) merged: bool,
    pub(crate) number: u64,
    pub(crate) reviews: Option<ApiReviews>,
    pub(crate) state: String,
    pub(crate) title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiPullRequestRepository {
    pub(crate) pull_request: Option<ApiPullRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequestByNumberData {
    pub(crate) repository: Option<ApiPullRequestRepository>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequestNodes {
    #[serde(default)]
    pub(crate) nodes: Vec<Option<ApiPullRequest>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiPullRequestsRepository {
    pub(crate) pull_requests: ApiPullRequestNodes,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequestsByReferenceData {
    pub(crate) repository: Option<ApiPullRequestsRepository>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiGitActor {
    pub(crate) user: Option<ApiActor>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiSignature {
    pub(crate) is_valid: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCommit {
    pub(crate) author: Option<ApiGitActor>,
    pub(crate) signature: Option<ApiSignature>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequestCommitNode {
    pub(crate) commit: ApiCommit,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequestCommitEdge {
    pub(crate) node: Option<ApiPullRequestCommitNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiCommitConnection {
    #[serde(default)]
    pub(crate) edges: Vec<Value>,
    pub(crate) page_info: PageInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCommitsPullRequest {
    pub(crate) commits: ApiCommitConnection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiCommitsRepository {
    pub(crate) pull_request: Option<ApiCommitsPullRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequestCommitsData {
    pub(crate) repository: Option<ApiCommitsRepository>,
}
