//! GitHub GraphQL access for pull request information.
//!
//! The pieces compose leaf first: [`catalog`] holds the query documents,
//! [`transport`] executes one request with bounded retries and rate-limit
//! waits, [`pagination`] walks cursor-based connections lazily,
//! [`normalize`] turns raw responses into the records in [`models`], and
//! [`client`] exposes the three public operations.

pub mod catalog;
pub mod client;
pub mod clock;
pub mod error;
pub mod locator;
pub mod models;
pub mod normalize;
pub mod pagination;
pub mod rate_limit;
pub mod transport;
pub mod variables;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use catalog::{QueryCatalog, QueryDefinition, QueryId};
pub use client::{CommitStream, PullRequestClient};
pub use clock::{Clock, TokioClock};
pub use error::FetchError;
pub use locator::{
    GraphQlEndpoint, PersonalAccessToken, PullRequestNumber, ReferenceName, RepositoryName,
    RepositoryOwner,
};
pub use models::{
    CommitNode, MergeStateStatus, MergeableState, PullRequestInformation, PullRequestState,
    ReviewEdge, ReviewState,
};
pub use pagination::{PageInfo, Paginator};
pub use rate_limit::RateLimitInfo;
pub use transport::{BackoffPolicy, GraphQlTransport, HttpTransport, TransportConfig};
pub use variables::{VariableValue, Variables};

#[cfg(test)]
pub use transport::MockGraphQlTransport;
