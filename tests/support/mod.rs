//! Shared test utilities.

pub mod runtime;

use std::sync::Arc;
use std::time::Duration;

use prfetch::github::test_support::RecordingClock;
use prfetch::github::{
    BackoffPolicy, GraphQlEndpoint, HttpTransport, PersonalAccessToken, PullRequestClient,
    PullRequestNumber, RepositoryName, RepositoryOwner, TransportConfig,
};
use wiremock::MockServer;

/// Unix time the recording clock reports.
pub const NOW: u64 = 1_700_000_000;

/// Client wired to a mock server with a clock that never sleeps.
pub type TestClient = PullRequestClient<HttpTransport<Arc<RecordingClock>>>;

/// Builds a client against `server`, returning the clock for assertions.
///
/// # Panics
///
/// Panics if the mock server URL or the transport cannot be constructed.
pub fn client_for(server: &MockServer) -> (TestClient, Arc<RecordingClock>) {
    let endpoint = GraphQlEndpoint::parse(&format!("{}/graphql", server.uri()))
        .unwrap_or_else(|error| panic!("mock endpoint should parse: {error}"));
    let token = PersonalAccessToken::new("ghp_integration")
        .unwrap_or_else(|error| panic!("token should be valid: {error}"));
    let config = TransportConfig::new(endpoint, token)
        .with_backoff(BackoffPolicy::new(Duration::from_millis(10), Duration::from_millis(100)).without_jitter());
    let clock = Arc::new(RecordingClock::at(NOW));
    let transport = HttpTransport::with_clock(config, Arc::clone(&clock))
        .unwrap_or_else(|error| panic!("transport should build: {error}"));
    (PullRequestClient::new(transport), clock)
}

/// `octo/repo`.
///
/// # Panics
///
/// Never in practice; the literals are valid.
pub fn repository() -> (RepositoryOwner, RepositoryName) {
    let owner = RepositoryOwner::new("octo").unwrap_or_else(|error| panic!("{error}"));
    let name = RepositoryName::new("repo").unwrap_or_else(|error| panic!("{error}"));
    (owner, name)
}

/// Validated pull request number.
///
/// # Panics
///
/// Panics when `value` is not a valid pull request number.
pub fn number(value: u64) -> PullRequestNumber {
    PullRequestNumber::new(value).unwrap_or_else(|error| panic!("{error}"))
}
