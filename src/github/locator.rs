//! Identity wrappers for repositories, pull requests, and the GraphQL
//! endpoint.

use std::fmt;

use url::Url;

use super::error::FetchError;

const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Validates that the owner is not blank.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingReference`] for an empty or blank value.
    pub fn new(value: &str) -> Result<Self, FetchError> {
        non_blank(value, "repository owner").map(Self)
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates that the name is not blank.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingReference`] for an empty or blank value.
    pub fn new(value: &str) -> Result<Self, FetchError> {
        non_blank(value, "repository name").map(Self)
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Head branch name used to look pull requests up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceName(String);

impl ReferenceName {
    /// Validates that the reference is not blank. A leading `refs/heads/`
    /// is stripped because GitHub matches on the bare branch name.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingReference`] for an empty or blank value.
    pub fn new(value: &str) -> Result<Self, FetchError> {
        let trimmed = value.trim();
        let bare = trimmed.strip_prefix("refs/heads/").unwrap_or(trimmed);
        non_blank(bare, "branch reference").map(Self)
    }

    /// Borrow the branch name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    /// Validates that the number is positive and fits GraphQL's `Int`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidPullRequestNumber`] for zero or values
    /// above `i32::MAX`.
    pub fn new(value: u64) -> Result<Self, FetchError> {
        if value == 0 || i32::try_from(value).is_err() {
            return Err(FetchError::InvalidPullRequestNumber);
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PullRequestNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, FetchError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(FetchError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PersonalAccessToken(<redacted>)")
    }
}

/// GitHub GraphQL endpoint URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphQlEndpoint(Url);

impl GraphQlEndpoint {
    /// Resolves an endpoint from user input.
    ///
    /// `github.com` and `api.github.com` map to the public API, a URL whose
    /// path already ends in `graphql` is used as given, and any other host is
    /// treated as GitHub Enterprise Server (`<host>/api/graphql`).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] when the input cannot be parsed or
    /// has no host.
    pub fn parse(input: &str) -> Result<Self, FetchError> {
        let parsed =
            Url::parse(input.trim()).map_err(|error| FetchError::InvalidUrl(error.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl("URL must include a host".to_owned()))?;

        if host.eq_ignore_ascii_case("github.com") || host.eq_ignore_ascii_case("api.github.com") {
            return Ok(Self::default());
        }

        if parsed.path().trim_end_matches('/').ends_with("graphql") {
            return Ok(Self(parsed));
        }

        let mut enterprise = parsed;
        enterprise.set_path("api/graphql");
        enterprise.set_query(None);
        Ok(Self(enterprise))
    }

    /// Borrow the URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.0
    }
}

impl Default for GraphQlEndpoint {
    #[expect(clippy::expect_used, reason = "constant URL always parses")]
    fn default() -> Self {
        Self(Url::parse(GITHUB_GRAPHQL_URL).expect("GitHub GraphQL URL should parse"))
    }
}

fn non_blank(value: &str, what: &'static str) -> Result<String, FetchError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FetchError::MissingReference { what });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{GraphQlEndpoint, PersonalAccessToken, PullRequestNumber, ReferenceName};
    use crate::github::error::FetchError;

    #[rstest]
    #[case::public_site("https://github.com", "https://api.github.com/graphql")]
    #[case::public_api("https://api.github.com/graphql", "https://api.github.com/graphql")]
    #[case::enterprise_host("https://ghe.example.com", "https://ghe.example.com/api/graphql")]
    #[case::enterprise_with_port(
        "http://127.0.0.1:8080",
        "http://127.0.0.1:8080/api/graphql"
    )]
    #[case::explicit_graphql_path("http://127.0.0.1:8080/graphql", "http://127.0.0.1:8080/graphql")]
    fn endpoint_resolution(#[case] input: &str, #[case] expected: &str) {
        let endpoint = GraphQlEndpoint::parse(input).expect("endpoint should parse");
        assert_eq!(endpoint.url().as_str(), expected);
    }

    #[rstest]
    fn endpoint_rejects_garbage() {
        let result = GraphQlEndpoint::parse("not a url");
        assert!(
            matches!(result, Err(FetchError::InvalidUrl(_))),
            "expected InvalidUrl, got {result:?}"
        );
    }

    #[rstest]
    #[case::zero(0)]
    #[case::beyond_graphql_int(u64::from(u32::MAX))]
    fn pull_request_number_rejects_out_of_range(#[case] value: u64) {
        assert_eq!(
            PullRequestNumber::new(value),
            Err(FetchError::InvalidPullRequestNumber)
        );
    }

    #[rstest]
    fn reference_name_strips_heads_prefix() {
        let reference = ReferenceName::new("refs/heads/feature/x").expect("reference is valid");
        assert_eq!(reference.as_str(), "feature/x");
    }

    #[rstest]
    #[case::blank("   ")]
    #[case::only_prefix("refs/heads/")]
    fn reference_name_rejects_blank(#[case] input: &str) {
        assert!(
            matches!(
                ReferenceName::new(input),
                Err(FetchError::MissingReference { .. })
            ),
            "blank reference should be rejected"
        );
    }

    #[rstest]
    fn token_debug_output_is_redacted() {
        let token = PersonalAccessToken::new(" ghp_secret ").expect("token should be valid");
        assert_eq!(token.value(), "ghp_secret");
        assert!(!format!("{token:?}").contains("ghp_secret"));
    }
}
