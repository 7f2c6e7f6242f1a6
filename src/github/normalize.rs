//! Conversion of raw GraphQL `data` trees into stable records.
//!
//! Every function here is pure. Enum-valued fields are checked against their
//! closed sets and fail with [`FetchError::UnknownEnumValue`] instead of
//! passing unknown values through. Absent optional fields stay `None`.

use serde_json::Value;

use super::error::FetchError;
use super::locator::{PullRequestNumber, RepositoryName, RepositoryOwner};
use super::models::api::{
    ApiPullRequest, ApiPullRequestByNumberData, ApiPullRequestCommitEdge,
    ApiPullRequestCommitsData, ApiPullRequestsByReferenceData, ApiReviewEdge,
};
use super::models::{
    CommitNode, MergeStateStatus, MergeableState, PullRequestInformation, PullRequestState,
    ReviewEdge, ReviewState,
};
use super::pagination::RawConnection;

/// Normalises the `data` tree of the by-number query.
///
/// # Errors
///
/// Returns [`FetchError::NotFound`] when the repository or the pull request
/// is null, [`FetchError::UnknownEnumValue`] for unrecognised enum values,
/// and [`FetchError::Decode`] when the tree has the wrong shape.
pub fn by_number(
    data: Value,
    owner: &RepositoryOwner,
    repository: &RepositoryName,
    number: PullRequestNumber,
) -> Result<PullRequestInformation, FetchError> {
    let parsed: ApiPullRequestByNumberData = serde_json::from_value(data)?;
    let pull_request = parsed
        .repository
        .ok_or_else(|| repository_not_found(owner, repository))?
        .pull_request
        .ok_or_else(|| FetchError::NotFound {
            resource: format!(
                "pull request {number} in {}/{}",
                owner.as_str(),
                repository.as_str()
            ),
        })?;
    pull_request_information(pull_request, owner, repository)
}

/// Normalises the `data` tree of the by-reference query.
///
/// Null entries in `nodes` are pull requests the token cannot see; they are
/// skipped.
///
/// # Errors
///
/// Returns [`FetchError::NotFound`] when the repository is null, otherwise
/// the first error raised while normalising a node.
pub fn by_reference(
    data: Value,
    owner: &RepositoryOwner,
    repository: &RepositoryName,
) -> Result<Vec<PullRequestInformation>, FetchError> {
    let parsed: ApiPullRequestsByReferenceData = serde_json::from_value(data)?;
    let nodes = parsed
        .repository
        .ok_or_else(|| repository_not_found(owner, repository))?
        .pull_requests
        .nodes;

    let hidden = nodes.iter().filter(|node| node.is_none()).count();
    if hidden > 0 {
        tracing::debug!(hidden, "skipping pull request nodes withheld by GitHub");
    }

    nodes
        .into_iter()
        .flatten()
        .map(|pull_request| pull_request_information(pull_request, owner, repository))
        .collect()
}

/// Extracts the `commits` connection from one page of the commits query.
///
/// # Errors
///
/// Returns [`FetchError::NotFound`] when the repository or pull request is
/// null and [`FetchError::Decode`] for any other shape mismatch.
pub fn commit_connection(data: Value) -> Result<RawConnection, FetchError> {
    let parsed: ApiPullRequestCommitsData = serde_json::from_value(data)?;
    let commits = parsed
        .repository
        .and_then(|repository| repository.pull_request)
        .ok_or_else(|| FetchError::NotFound {
            resource: "pull request".to_owned(),
        })?
        .commits;
    Ok(RawConnection {
        edges: commits.edges,
        page_info: commits.page_info,
    })
}

/// Normalises one edge of the commits connection.
///
/// # Errors
///
/// Returns [`FetchError::Decode`] when the edge or its node is malformed.
pub fn commit_node(edge: Value) -> Result<CommitNode, FetchError> {
    let parsed: ApiPullRequestCommitEdge = serde_json::from_value(edge)?;
    let commit = parsed
        .node
        .ok_or_else(|| FetchError::decode("commit edge has no node"))?
        .commit;
    Ok(CommitNode {
        author_login: commit
            .author
            .and_then(|author| author.user)
            .map(|user| user.login),
        signature_valid: commit.signature.map(|signature| signature.is_valid),
    })
}

fn pull_request_information(
    pull_request: ApiPullRequest,
    owner: &RepositoryOwner,
    repository: &RepositoryName,
) -> Result<PullRequestInformation, FetchError> {
    let pull_request_state = parse_enum("state", &pull_request.state, PullRequestState::from_graphql)?;
    let mergeable_state = parse_enum(
        "mergeable",
        &pull_request.mergeable,
        MergeableState::from_graphql,
    )?;
    let merge_state_status = pull_request
        .merge_state_status
        .as_deref()
        .map(|value| parse_enum("mergeStateStatus", value, MergeStateStatus::from_graphql))
        .transpose()?;

    if pull_request.merged && pull_request_state != PullRequestState::Merged {
        return Err(FetchError::decode(format!(
            "pull request #{} is merged but has state {}",
            pull_request.number,
            pull_request_state.as_str()
        )));
    }

    let head = pull_request
        .commits
        .edges
        .into_iter()
        .flatten()
        .filter_map(|edge| edge.node)
        .last()
        .ok_or_else(|| {
            FetchError::decode(format!(
                "pull request #{} has no commits",
                pull_request.number
            ))
        })?
        .commit;

    let review_edges = pull_request
        .reviews
        .and_then(|reviews| reviews.edges)
        .unwrap_or_default()
        .into_iter()
        .map(review_edge)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PullRequestInformation {
        author_login: pull_request.author.map(|author| author.login),
        commit_message: head.message,
        commit_message_headline: head.message_headline,
        merge_state_status,
        mergeable_state,
        merged: pull_request.merged,
        pull_request_id: pull_request.id,
        pull_request_number: pull_request.number,
        pull_request_state,
        pull_request_title: pull_request.title,
        repository_name: repository.as_str().to_owned(),
        repository_owner: owner.as_str().to_owned(),
        review_edges,
    })
}

fn review_edge(edge: Option<ApiReviewEdge>) -> Result<Option<ReviewEdge>, FetchError> {
    edge.and_then(|present| present.node)
        .map(|review| {
            parse_enum("reviews.state", &review.state, ReviewState::from_graphql)
                .map(|state| ReviewEdge { state })
        })
        .transpose()
}

fn parse_enum<T>(
    field: &str,
    value: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, FetchError> {
    parse(value).ok_or_else(|| FetchError::UnknownEnumValue {
        field: field.to_owned(),
        value: value.to_owned(),
    })
}

fn repository_not_found(owner: &RepositoryOwner, repository: &RepositoryName) -> FetchError {
    FetchError::NotFound {
        resource: format!("repository {}/{}", owner.as_str(), repository.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::{by_number, by_reference, commit_connection, commit_node};
    use crate::github::error::FetchError;
    use crate::github::locator::{PullRequestNumber, RepositoryName, RepositoryOwner};
    use crate::github::models::{
        MergeStateStatus, MergeableState, PullRequestState, ReviewEdge, ReviewState,
    };
    use crate::github::test_support::{
        PullRequestFixture, commit_edge, commits_page_data, pull_request_by_number_data,
        pull_requests_by_reference_data,
    };

    #[fixture]
    fn owner() -> RepositoryOwner {
        RepositoryOwner::new("octo").expect("owner is valid")
    }

    #[fixture]
    fn repository() -> RepositoryName {
        RepositoryName::new("repo").expect("name is valid")
    }

    fn number(value: u64) -> PullRequestNumber {
        PullRequestNumber::new(value).expect("number is valid")
    }

    #[rstest]
    fn open_pull_request_is_normalised(owner: RepositoryOwner, repository: RepositoryName) {
        let data = pull_request_by_number_data(Some(&PullRequestFixture::open(7)));

        let record = by_number(data, &owner, &repository, number(7)).expect("record should build");

        assert_eq!(record.pull_request_number, 7);
        assert_eq!(record.pull_request_state, PullRequestState::Open);
        assert_eq!(record.mergeable_state, MergeableState::Mergeable);
        assert_eq!(record.merge_state_status, Some(MergeStateStatus::Clean));
        assert_eq!(record.author_login.as_deref(), Some("octocat"));
        assert_eq!(record.commit_message_headline, "Fix the widget (#7)");
        assert_eq!(record.repository_owner, "octo");
        assert_eq!(record.repository_name, "repo");
        assert_eq!(
            record.review_edges,
            vec![Some(ReviewEdge {
                state: ReviewState::Approved
            })]
        );
    }

    #[rstest]
    fn null_review_nodes_keep_their_position(owner: RepositoryOwner, repository: RepositoryName) {
        let mut fixture = PullRequestFixture::open(3);
        fixture.reviews = vec![Some("APPROVED"), None];

        let record = by_number(
            pull_request_by_number_data(Some(&fixture)),
            &owner,
            &repository,
            number(3),
        )
        .expect("record should build");

        assert_eq!(record.review_edges.len(), 2);
        assert_eq!(
            record.review_edges.first(),
            Some(&Some(ReviewEdge {
                state: ReviewState::Approved
            }))
        );
        assert_eq!(record.review_edges.get(1), Some(&None));
        assert_eq!(record.visible_reviews().count(), 1);
    }

    #[rstest]
    fn absent_merge_state_status_stays_absent(owner: RepositoryOwner, repository: RepositoryName) {
        let mut fixture = PullRequestFixture::open(4);
        fixture.merge_state_status = None;

        let record = by_number(
            pull_request_by_number_data(Some(&fixture)),
            &owner,
            &repository,
            number(4),
        )
        .expect("record should build");

        assert_eq!(record.merge_state_status, None);
    }

    #[rstest]
    #[case::mergeable("mergeable")]
    #[case::state("state")]
    #[case::merge_state_status("mergeStateStatus")]
    fn unknown_enum_values_are_rejected(
        owner: RepositoryOwner,
        repository: RepositoryName,
        #[case] field: &'static str,
    ) {
        let mut fixture = PullRequestFixture::open(5);
        match field {
            "mergeable" => fixture.mergeable = "BOGUS",
            "state" => fixture.state = "BOGUS",
            _ => fixture.merge_state_status = Some("BOGUS"),
        }

        let result = by_number(
            pull_request_by_number_data(Some(&fixture)),
            &owner,
            &repository,
            number(5),
        );

        assert_eq!(
            result,
            Err(FetchError::UnknownEnumValue {
                field: field.to_owned(),
                value: "BOGUS".to_owned()
            })
        );
    }

    #[rstest]
    fn unknown_review_state_is_rejected(owner: RepositoryOwner, repository: RepositoryName) {
        let mut fixture = PullRequestFixture::open(6);
        fixture.reviews = vec![Some("SHRUGGED")];

        let result = by_number(
            pull_request_by_number_data(Some(&fixture)),
            &owner,
            &repository,
            number(6),
        );

        assert!(
            matches!(result, Err(FetchError::UnknownEnumValue { ref field, .. }) if field == "reviews.state"),
            "unexpected result {result:?}"
        );
    }

    #[rstest]
    fn merged_flag_requires_merged_state(owner: RepositoryOwner, repository: RepositoryName) {
        let mut fixture = PullRequestFixture::open(8);
        fixture.merged = true;

        let result = by_number(
            pull_request_by_number_data(Some(&fixture)),
            &owner,
            &repository,
            number(8),
        );

        assert!(matches!(result, Err(FetchError::Decode { .. })));
    }

    #[rstest]
    fn missing_pull_request_is_not_found(owner: RepositoryOwner, repository: RepositoryName) {
        let result = by_number(pull_request_by_number_data(None), &owner, &repository, number(9));

        assert!(
            matches!(result, Err(FetchError::NotFound { ref resource }) if resource.contains("#9")),
            "unexpected result {result:?}"
        );
    }

    #[rstest]
    fn missing_required_field_is_a_decode_error(
        owner: RepositoryOwner,
        repository: RepositoryName,
    ) {
        let data = json!({ "repository": { "pullRequest": { "number": 1 } } });

        assert!(matches!(
            by_number(data, &owner, &repository, number(1)),
            Err(FetchError::Decode { .. })
        ));
    }

    #[rstest]
    fn pull_request_without_commits_is_a_decode_error(
        owner: RepositoryOwner,
        repository: RepositoryName,
    ) {
        let mut node = PullRequestFixture::open(2).to_json();
        node["commits"] = json!({ "edges": [] });
        let data = json!({ "repository": { "pullRequest": node } });

        assert!(matches!(
            by_number(data, &owner, &repository, number(2)),
            Err(FetchError::Decode { .. })
        ));
    }

    #[rstest]
    fn by_reference_keeps_server_order_and_skips_hidden_nodes(
        owner: RepositoryOwner,
        repository: RepositoryName,
    ) {
        let mut data =
            pull_requests_by_reference_data(&[PullRequestFixture::open(11), PullRequestFixture::open(12)]);
        if let Some(nodes) = data["repository"]["pullRequests"]["nodes"].as_array_mut() {
            nodes.insert(1, json!(null));
        }

        let records = by_reference(data, &owner, &repository).expect("records should build");

        let numbers: Vec<u64> = records
            .iter()
            .map(|record| record.pull_request_number)
            .collect();
        assert_eq!(numbers, vec![11, 12]);
    }

    #[rstest]
    fn by_reference_with_no_matches_is_empty(owner: RepositoryOwner, repository: RepositoryName) {
        let records = by_reference(pull_requests_by_reference_data(&[]), &owner, &repository)
            .expect("records should build");
        assert!(records.is_empty());
    }

    #[rstest]
    fn missing_repository_is_not_found(owner: RepositoryOwner, repository: RepositoryName) {
        let result = by_reference(json!({ "repository": null }), &owner, &repository);
        assert!(matches!(result, Err(FetchError::NotFound { .. })));
    }

    #[rstest]
    #[case::linked_and_signed(Some("octocat"), Some(true))]
    #[case::invalid_signature(Some("octocat"), Some(false))]
    #[case::no_linked_account(None, Some(true))]
    #[case::unsigned(Some("octocat"), None)]
    fn commit_nodes_keep_absent_fields(
        #[case] login: Option<&str>,
        #[case] signature_valid: Option<bool>,
    ) {
        let node = commit_node(commit_edge(login, signature_valid)).expect("node should build");

        assert_eq!(node.author_login.as_deref(), login);
        assert_eq!(node.signature_valid, signature_valid);
        assert_eq!(node.is_signed(), signature_valid.is_some());
    }

    #[rstest]
    fn commit_connection_exposes_edges_and_page_info() {
        let data = commits_page_data(
            vec![commit_edge(Some("a"), None), commit_edge(Some("b"), None)],
            Some("Y3Vyc29y"),
            true,
        );

        let connection = commit_connection(data).expect("connection should parse");

        assert_eq!(connection.edges.len(), 2);
        assert_eq!(connection.page_info.end_cursor(), Some("Y3Vyc29y"));
        assert!(connection.page_info.has_next_page());
    }

    #[rstest]
    fn commit_connection_for_missing_pull_request_is_not_found() {
        let data = json!({ "repository": { "pullRequest": null } });
        assert!(matches!(
            commit_connection(data),
            Err(FetchError::NotFound { .. })
        ));
    }
}
