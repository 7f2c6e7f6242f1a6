//! Behavioural tests for pull request lookup by number.

mod support;

use std::sync::Arc;
use std::time::Duration;

use prfetch::github::test_support::{
    PullRequestFixture, RecordingClock, envelope, pull_request_by_number_data,
};
use prfetch::{FetchError, PullRequestInformation};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::runtime::{SharedRuntime, runtime_with_server};
use support::{client_for, number, repository};

#[derive(ScenarioState, Default)]
struct LookupState {
    runtime: Slot<SharedRuntime>,
    server: Slot<MockServer>,
    clock: Slot<Arc<RecordingClock>>,
    pull_request: Slot<PullRequestInformation>,
    error: Slot<FetchError>,
}

#[fixture]
fn lookup_state() -> LookupState {
    LookupState::default()
}

fn mount(lookup_state: &LookupState, mocks: Vec<Mock>) -> Result<(), FetchError> {
    let runtime = runtime_with_server(&lookup_state.runtime, &lookup_state.server)?;
    lookup_state
        .server
        .with_ref(|server| {
            for mock in mocks {
                runtime.block_on(mock.mount(server));
            }
        })
        .ok_or_else(|| FetchError::Api {
            message: "mock server not initialised".to_owned(),
        })
}

fn graphql_response(fixture: Option<&PullRequestFixture>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(envelope(pull_request_by_number_data(fixture)))
}

fn expected_error(lookup_state: &LookupState) -> Result<FetchError, FetchError> {
    lookup_state.error.get().ok_or_else(|| FetchError::Api {
        message: "expected the lookup to fail".to_owned(),
    })
}

// --- Given steps ---

#[given("a mock GitHub GraphQL server with open pull request {pr:u64}")]
fn seed_open_pull_request(lookup_state: &LookupState, pr: u64) -> Result<(), FetchError> {
    let fixture = PullRequestFixture::open(pr);
    let mock = Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(graphql_response(Some(&fixture)));
    mount(lookup_state, vec![mock])
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("a mock GitHub GraphQL server with pull request {pr:u64} whose mergeable state is {state}")]
fn seed_pull_request_with_mergeable_state(
    lookup_state: &LookupState,
    pr: u64,
    state: String,
) -> Result<(), FetchError> {
    let mut fixture = PullRequestFixture::open(pr);
    fixture.mergeable = match state.trim_matches('"') {
        "BOGUS" => "BOGUS",
        "CONFLICTING" => "CONFLICTING",
        "MERGEABLE" => "MERGEABLE",
        "UNKNOWN" => "UNKNOWN",
        other => {
            return Err(FetchError::Api {
                message: format!("unsupported mergeable state in scenario: {other}"),
            });
        }
    };
    let mock = Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(graphql_response(Some(&fixture)));
    mount(lookup_state, vec![mock])
}

#[given("a mock GitHub GraphQL server without pull request {pr:u64}")]
fn seed_missing_pull_request(lookup_state: &LookupState, pr: u64) -> Result<(), FetchError> {
    let mock = Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "variables": { "pullRequestNumber": pr } })))
        .respond_with(graphql_response(None));
    mount(lookup_state, vec![mock])
}

#[given(
    "a mock GitHub GraphQL server that rate limits for {seconds:u64} seconds before returning \
     pull request {pr:u64}"
)]
fn seed_rate_limited_server(
    lookup_state: &LookupState,
    seconds: u64,
    pr: u64,
) -> Result<(), FetchError> {
    let limited = Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("retry-after", seconds.to_string().as_str())
                .set_body_json(json!({
                    "errors": [{ "type": "RATE_LIMITED", "message": "API rate limit exceeded" }]
                })),
        )
        .up_to_n_times(1);
    let fixture = PullRequestFixture::open(pr);
    let recovered = Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(graphql_response(Some(&fixture)));
    mount(lookup_state, vec![limited, recovered])
}

// --- When steps ---

#[when("the client fetches pull request {pr:u64}")]
fn fetch_pull_request(lookup_state: &LookupState, pr: u64) -> Result<(), FetchError> {
    let runtime = lookup_state.runtime.get().ok_or_else(|| FetchError::Api {
        message: "runtime not initialised".to_owned(),
    })?;
    let (client, clock) = lookup_state
        .server
        .with_ref(client_for)
        .ok_or_else(|| FetchError::Api {
            message: "mock server not initialised".to_owned(),
        })?;
    let (owner, name) = repository();

    let result = runtime.block_on(client.find_by_number(&owner, &name, number(pr)));
    lookup_state.clock.set(clock);

    match result {
        Ok(pull_request) => {
            drop(lookup_state.error.take());
            lookup_state.pull_request.set(pull_request);
        }
        Err(error) => {
            drop(lookup_state.pull_request.take());
            lookup_state.error.set(error);
        }
    }
    Ok(())
}

// --- Then steps ---

#[then("the pull request number is {pr:u64}")]
fn assert_number(lookup_state: &LookupState, pr: u64) -> Result<(), FetchError> {
    let actual = lookup_state
        .pull_request
        .with_ref(|pull_request| pull_request.pull_request_number)
        .ok_or_else(|| FetchError::Api {
            message: format!(
                "pull request missing, error was {:?}",
                lookup_state.error.get()
            ),
        })?;

    if actual == pr {
        Ok(())
    } else {
        Err(FetchError::Api {
            message: format!("expected pull request {pr} but found {actual}"),
        })
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("the error reports an unknown value for {field}")]
fn assert_unknown_value(lookup_state: &LookupState, field: String) -> Result<(), FetchError> {
    let expected_field = field.trim_matches('"');
    match expected_error(lookup_state)? {
        FetchError::UnknownEnumValue { field: actual, .. } if actual == expected_field => Ok(()),
        other => Err(FetchError::Api {
            message: format!("expected UnknownEnumValue for {expected_field}, got {other:?}"),
        }),
    }
}

#[then("the error reports that the pull request was not found")]
fn assert_not_found(lookup_state: &LookupState) -> Result<(), FetchError> {
    match expected_error(lookup_state)? {
        FetchError::NotFound { .. } => Ok(()),
        other => Err(FetchError::Api {
            message: format!("expected NotFound, got {other:?}"),
        }),
    }
}

#[then("the client did not wait")]
fn assert_no_wait(lookup_state: &LookupState) -> Result<(), FetchError> {
    assert_sleeps(lookup_state, &[])
}

#[then("the client waited {seconds:u64} seconds once")]
fn assert_single_wait(lookup_state: &LookupState, seconds: u64) -> Result<(), FetchError> {
    assert_sleeps(lookup_state, &[Duration::from_secs(seconds)])
}

fn assert_sleeps(lookup_state: &LookupState, expected: &[Duration]) -> Result<(), FetchError> {
    let sleeps = lookup_state
        .clock
        .with_ref(|clock| clock.sleeps())
        .ok_or_else(|| FetchError::Api {
            message: "clock missing".to_owned(),
        })?;

    if sleeps == expected {
        Ok(())
    } else {
        Err(FetchError::Api {
            message: format!("expected waits {expected:?} but saw {sleeps:?}"),
        })
    }
}

#[scenario(path = "tests/features/pull_request_lookup.feature", index = 0)]
fn fetch_by_number(lookup_state: LookupState) {
    let _ = lookup_state;
}

#[scenario(path = "tests/features/pull_request_lookup.feature", index = 1)]
fn reject_unknown_mergeable_state(lookup_state: LookupState) {
    let _ = lookup_state;
}

#[scenario(path = "tests/features/pull_request_lookup.feature", index = 2)]
fn report_missing_pull_request(lookup_state: LookupState) {
    let _ = lookup_state;
}

#[scenario(path = "tests/features/pull_request_lookup.feature", index = 3)]
fn retry_after_rate_limit(lookup_state: LookupState) {
    let _ = lookup_state;
}
