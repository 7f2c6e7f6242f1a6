//! Test doubles and response fixtures shared by unit and integration tests.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::clock::Clock;

/// Clock that never sleeps and records every requested suspension.
#[derive(Debug, Default)]
pub struct RecordingClock {
    now_unix: u64,
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingClock {
    /// Clock frozen at `now_unix`.
    #[must_use]
    pub const fn at(now_unix: u64) -> Self {
        Self {
            now_unix,
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Suspensions requested so far, in order.
    #[must_use]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
    }

    fn now_unix_seconds(&self) -> u64 {
        self.now_unix
    }
}

/// Raw pull request node as GitHub returns it.
#[derive(Debug, Clone)]
pub struct PullRequestFixture {
    /// Pull request number.
    pub number: u64,
    /// `state` value.
    pub state: &'static str,
    /// `merged` value.
    pub merged: bool,
    /// `mergeable` value.
    pub mergeable: &'static str,
    /// `mergeStateStatus` value; omitted from the JSON when `None`.
    pub merge_state_status: Option<&'static str>,
    /// Review edges; `None` entries become edges with a null node.
    pub reviews: Vec<Option<&'static str>>,
}

impl PullRequestFixture {
    /// Open, mergeable pull request with one approval.
    #[must_use]
    pub fn open(number: u64) -> Self {
        Self {
            number,
            state: "OPEN",
            merged: false,
            mergeable: "MERGEABLE",
            merge_state_status: Some("CLEAN"),
            reviews: vec![Some("APPROVED")],
        }
    }

    /// Renders the node JSON.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let review_edges: Vec<Value> = self
            .reviews
            .iter()
            .map(|review| match review {
                Some(state) => json!({ "node": { "state": state } }),
                None => json!({ "node": null }),
            })
            .collect();

        let mut node = json!({
            "author": { "login": "octocat" },
            "commits": {
                "edges": [{
                    "node": {
                        "commit": {
                            "message": format!("Fix the widget (#{})\n\nLonger body.", self.number),
                            "messageHeadline": format!("Fix the widget (#{})", self.number)
                        }
                    }
                }]
            },
            "id": format!("PR_kwDO{}", self.number),
            "mergeable": self.mergeable,
            "merged": self.merged,
            "number": self.number,
            "reviews": { "edges": review_edges },
            "state": self.state,
            "title": format!("Pull request {}", self.number)
        });
        if let (Some(status), Some(object)) = (self.merge_state_status, node.as_object_mut()) {
            object.insert("mergeStateStatus".to_owned(), json!(status));
        }
        node
    }
}

/// `data` tree for the by-number query.
#[must_use]
pub fn pull_request_by_number_data(pull_request: Option<&PullRequestFixture>) -> Value {
    json!({
        "repository": {
            "pullRequest": pull_request.map(PullRequestFixture::to_json)
        }
    })
}

/// `data` tree for the by-reference query.
#[must_use]
pub fn pull_requests_by_reference_data(pull_requests: &[PullRequestFixture]) -> Value {
    let nodes: Vec<Value> = pull_requests
        .iter()
        .map(PullRequestFixture::to_json)
        .collect();
    json!({ "repository": { "pullRequests": { "nodes": nodes } } })
}

/// One commit edge.
#[must_use]
pub fn commit_edge(login: Option<&str>, signature_valid: Option<bool>) -> Value {
    json!({
        "node": {
            "commit": {
                "author": { "user": login.map(|name| json!({ "login": name })) },
                "signature": signature_valid.map(|valid| json!({ "isValid": valid }))
            }
        }
    })
}

/// `data` tree for one page of the commits query.
#[must_use]
pub fn commits_page_data(edges: Vec<Value>, end_cursor: Option<&str>, has_next_page: bool) -> Value {
    json!({
        "repository": {
            "pullRequest": {
                "commits": {
                    "edges": edges,
                    "pageInfo": { "endCursor": end_cursor, "hasNextPage": has_next_page }
                }
            }
        }
    })
}

/// Wraps a `data` tree in a GraphQL response envelope.
#[must_use]
pub fn envelope(data: Value) -> Value {
    json!({ "data": data })
}
