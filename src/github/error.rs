//! Error types exposed by the GitHub GraphQL client.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Errors surfaced while validating input, talking to GitHub, or normalising
/// its responses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The requested query identifier is not registered in the catalogue.
    #[error("unknown query: {id}")]
    UnknownQuery {
        /// Identifier that failed to resolve.
        id: String,
    },

    /// A variable the query declares as required was not supplied.
    #[error("query {query} requires variable ${name}")]
    MissingVariable {
        /// Operation name of the query being executed.
        query: String,
        /// Name of the missing variable.
        name: String,
    },

    /// A supplied variable does not match the type the query declares.
    #[error("query {query} expects ${name} to be {expected}")]
    InvalidVariable {
        /// Operation name of the query being executed.
        query: String,
        /// Name of the offending variable.
        name: String,
        /// GraphQL type the query declares for the variable.
        expected: String,
    },

    /// Every transport attempt failed with a transient error.
    #[error("GitHub request failed after {attempts} attempts: {message}")]
    TransportExhausted {
        /// Number of attempts made, including the first.
        attempts: u32,
        /// Detail from the last transport failure.
        message: String,
    },

    /// GitHub kept signalling a rate limit after every permitted wait.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Rate limit headers from the last response, when present.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub.
        message: String,
    },

    /// GitHub answered with a GraphQL error array that is not a rate limit.
    #[error("GitHub GraphQL error: {}", messages.join("; "))]
    GraphQl {
        /// Messages taken from the `errors` array, in response order.
        messages: Vec<String>,
    },

    /// The requested pull request does not exist or is not visible.
    #[error("{resource} not found")]
    NotFound {
        /// Human-readable description of the missing resource.
        resource: String,
    },

    /// An enum-valued field carried a value outside its closed set.
    #[error("unrecognised value {value:?} for {field}")]
    UnknownEnumValue {
        /// GraphQL field name holding the value.
        field: String,
        /// Raw value returned by GitHub.
        value: String,
    },

    /// The response did not have the expected shape.
    #[error("malformed GitHub response: {message}")]
    Decode {
        /// Description of the mismatch.
        message: String,
    },

    /// The token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// Status and message returned with the 401/403 response.
        message: String,
    },

    /// GitHub returned a non-transient HTTP error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Status and message returned by GitHub.
        message: String,
    },

    /// The endpoint URL could not be parsed.
    #[error("GraphQL endpoint is invalid: {0}")]
    InvalidUrl(String),

    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// The pull request number is not a positive integer.
    #[error("pull request number must be a positive integer")]
    InvalidPullRequestNumber,

    /// A repository owner, repository name, or branch reference was blank.
    #[error("{what} must not be empty")]
    MissingReference {
        /// Which identifier was blank.
        what: &'static str,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl FetchError {
    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(error: serde_json::Error) -> Self {
        Self::decode(error.to_string())
    }
}
