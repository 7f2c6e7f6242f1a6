//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.prfetch.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PRFETCH_OWNER`, `PRFETCH_TOKEN`, or legacy
//!    `GITHUB_TOKEN`, and so on
//! 4. **Command-line arguments** – `--owner`/`-o`, `--number`/`-n`, ...
//!
//! # Configuration File
//!
//! ```toml
//! token = "ghp_example"
//! endpoint = "https://ghe.example.com"
//! owner = "octocat"
//! repo = "hello-world"
//! page_size = 100
//! max_rate_limit_retries = 5
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::error::FetchError;
use crate::github::locator::{
    GraphQlEndpoint, PersonalAccessToken, PullRequestNumber, ReferenceName, RepositoryName,
    RepositoryOwner,
};
use crate::github::transport::TransportConfig;

/// What the binary was asked to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Pull requests whose head branch matches the reference.
    ByReference(ReferenceName),
    /// A single pull request.
    ByNumber(PullRequestNumber),
    /// Every commit of a pull request.
    Commits(PullRequestNumber),
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `PRFETCH_TOKEN`, `GITHUB_TOKEN`, or `--token`: Authentication token
/// - `PRFETCH_ENDPOINT` or `--endpoint`: GitHub or GitHub Enterprise URL
/// - `PRFETCH_OWNER` or `--owner`: Repository owner
/// - `PRFETCH_REPO` or `--repo`: Repository name
/// - `PRFETCH_NUMBER` or `--number`: Pull request number
/// - `PRFETCH_REFERENCE` or `--reference`: Head branch name
///
/// # Example
///
/// ```no_run
/// use prfetch::PrFetchConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = PrFetchConfig::load().expect("failed to load configuration");
/// let transport = config.transport_config().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PRFETCH",
    discovery(
        dotfile_name = ".prfetch.toml",
        config_file_name = "prfetch.toml",
        app_name = "prfetch"
    )
)]
pub struct PrFetchConfig {
    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `PRFETCH_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// GitHub host or GraphQL URL. Defaults to the public API.
    ///
    /// Can be provided via:
    /// - CLI: `--endpoint <URL>` or `-e <URL>`
    /// - Environment: `PRFETCH_ENDPOINT`
    /// - Config file: `endpoint = "..."`
    #[ortho_config(cli_short = 'e')]
    pub endpoint: Option<String>,

    /// Repository owner (e.g., "octocat").
    #[ortho_config(cli_short = 'o')]
    pub owner: Option<String>,

    /// Repository name (e.g., "hello-world").
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Pull request number to fetch.
    #[ortho_config(cli_short = 'n')]
    pub number: Option<u64>,

    /// Head branch whose pull requests should be listed.
    #[ortho_config(cli_short = 'b')]
    pub reference: Option<String>,

    /// Lists the commits of `number` instead of its summary.
    ///
    /// Can be provided via:
    /// - CLI: `--commits` / `-c`
    /// - Config file: `commits = true`
    ///
    /// Note: `PRFETCH_COMMITS` is not supported because `ortho_config` does
    /// not load boolean values from the environment.
    #[ortho_config(cli_short = 'c')]
    pub commits: bool,

    /// Commits requested per page (1 to 100).
    #[ortho_config()]
    pub page_size: u32,

    /// Per-attempt request deadline, in seconds.
    #[ortho_config()]
    pub timeout_seconds: u64,

    /// Retries allowed after transient transport failures.
    #[ortho_config()]
    pub max_transport_retries: u32,

    /// Waits allowed after rate-limited responses.
    #[ortho_config()]
    pub max_rate_limit_retries: u32,

    /// Wait used when a rate-limited response gives no reset hint, in
    /// seconds.
    #[ortho_config()]
    pub default_rate_limit_wait_seconds: u64,
}

const DEFAULT_PAGE_SIZE: u32 = 50;

impl Default for PrFetchConfig {
    fn default() -> Self {
        Self {
            token: None,
            endpoint: None,
            owner: None,
            repo: None,
            number: None,
            reference: None,
            commits: false,
            page_size: DEFAULT_PAGE_SIZE,
            timeout_seconds: TransportConfig::DEFAULT_REQUEST_TIMEOUT.as_secs(),
            max_transport_retries: TransportConfig::DEFAULT_MAX_TRANSPORT_RETRIES,
            max_rate_limit_retries: TransportConfig::DEFAULT_MAX_RATE_LIMIT_RETRIES,
            default_rate_limit_wait_seconds: TransportConfig::DEFAULT_RATE_LIMIT_WAIT.as_secs(),
        }
    }
}

impl PrFetchConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingToken`] when no token source provides a
    /// value.
    pub fn resolve_token(&self) -> Result<String, FetchError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(FetchError::MissingToken)
    }

    /// Returns owner and repo if both are configured.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Configuration`] when owner or repo is missing
    /// and [`FetchError::MissingReference`] when either is blank.
    pub fn require_repository(&self) -> Result<(RepositoryOwner, RepositoryName), FetchError> {
        match (&self.owner, &self.repo) {
            (Some(owner), Some(repo)) => {
                Ok((RepositoryOwner::new(owner)?, RepositoryName::new(repo)?))
            }
            (None, _) => Err(FetchError::Configuration {
                message: "repository owner is required (use --owner or -o)".to_owned(),
            }),
            (_, None) => Err(FetchError::Configuration {
                message: "repository name is required (use --repo or -r)".to_owned(),
            }),
        }
    }

    /// Determines what to fetch.
    ///
    /// `commits` with `number` lists commits, `number` alone fetches one pull
    /// request, and `reference` alone lists pull requests for a branch.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Configuration`] when both or neither of
    /// `number` and `reference` are set, or when `commits` is set without
    /// `number`. Invalid values surface as the matching validation error.
    pub fn operation(&self) -> Result<Operation, FetchError> {
        match (self.number, self.reference.as_deref()) {
            (Some(_), Some(_)) => Err(FetchError::Configuration {
                message: "use either --number or --reference, not both".to_owned(),
            }),
            (None, None) => Err(FetchError::Configuration {
                message: "a pull request number (--number) or branch (--reference) is required"
                    .to_owned(),
            }),
            (Some(number), None) => {
                let number = PullRequestNumber::new(number)?;
                Ok(if self.commits {
                    Operation::Commits(number)
                } else {
                    Operation::ByNumber(number)
                })
            }
            (None, Some(_)) if self.commits => Err(FetchError::Configuration {
                message: "--commits requires --number".to_owned(),
            }),
            (None, Some(reference)) => Ok(Operation::ByReference(ReferenceName::new(reference)?)),
        }
    }

    /// Resolves the endpoint, falling back to the public GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] when the configured value cannot be
    /// parsed.
    pub fn graphql_endpoint(&self) -> Result<GraphQlEndpoint, FetchError> {
        self.endpoint
            .as_deref()
            .map_or_else(|| Ok(GraphQlEndpoint::default()), GraphQlEndpoint::parse)
    }

    /// Builds the transport settings.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingToken`] when no token is available,
    /// [`FetchError::InvalidUrl`] for a malformed endpoint and
    /// [`FetchError::Configuration`] for a zero request timeout.
    pub fn transport_config(&self) -> Result<TransportConfig, FetchError> {
        if self.timeout_seconds == 0 {
            return Err(FetchError::Configuration {
                message: "timeout_seconds must be at least 1".to_owned(),
            });
        }
        let token = PersonalAccessToken::new(self.resolve_token()?)?;
        Ok(TransportConfig::new(self.graphql_endpoint()?, token)
            .with_request_timeout(Duration::from_secs(self.timeout_seconds))
            .with_max_transport_retries(self.max_transport_retries)
            .with_max_rate_limit_retries(self.max_rate_limit_retries)
            .with_default_rate_limit_wait(Duration::from_secs(
                self.default_rate_limit_wait_seconds,
            )))
    }
}

#[cfg(test)]
mod tests;
