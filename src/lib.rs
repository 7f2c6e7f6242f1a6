//! prfetch library crate for fetching pull request information from GitHub.
//!
//! The library runs a fixed set of GraphQL queries against GitHub or GitHub
//! Enterprise, retries transient failures, waits out rate limits, walks
//! paginated commit lists lazily, and normalises the responses into typed
//! records that fail closed on unrecognised enum values.

pub mod config;
pub mod github;

pub use config::{Operation, PrFetchConfig};
pub use github::{
    CommitNode, CommitStream, FetchError, HttpTransport, PersonalAccessToken,
    PullRequestClient, PullRequestInformation, TransportConfig,
};
