//! Public pull request operations composed from the catalogue, transport,
//! paginator, and normaliser.

use super::catalog::{QueryCatalog, QueryDefinition, QueryId, variable};
use super::error::FetchError;
use super::locator::{PullRequestNumber, ReferenceName, RepositoryName, RepositoryOwner};
use super::models::{CommitNode, PullRequestInformation};
use super::normalize;
use super::pagination::Paginator;
use super::transport::GraphQlTransport;
use super::variables::Variables;

/// Fetches pull request information and commits from GitHub.
///
/// The client borrows nothing between calls, so one value can drive any
/// number of concurrent operations as long as the transport allows it.
///
/// # Example
///
/// ```no_run
/// use prfetch::github::{
///     GraphQlEndpoint, HttpTransport, PersonalAccessToken, PullRequestClient,
///     PullRequestNumber, RepositoryName, RepositoryOwner, TransportConfig,
/// };
///
/// # async fn run() -> Result<(), prfetch::github::FetchError> {
/// let token = PersonalAccessToken::new("ghp_example")?;
/// let transport = HttpTransport::new(TransportConfig::new(GraphQlEndpoint::default(), token))?;
/// let client = PullRequestClient::new(transport);
///
/// let owner = RepositoryOwner::new("octo")?;
/// let repository = RepositoryName::new("repo")?;
/// let pull_request = client
///     .find_by_number(&owner, &repository, PullRequestNumber::new(42)?)
///     .await?;
/// assert_eq!(pull_request.pull_request_number, 42);
/// # Ok(())
/// # }
/// ```
pub struct PullRequestClient<T> {
    transport: T,
    catalog: QueryCatalog,
    page_size: u32,
}

impl<T: GraphQlTransport> PullRequestClient<T> {
    /// Default number of commits requested per page.
    pub const DEFAULT_PAGE_SIZE: u32 = 50;
    /// Largest page GitHub accepts for a connection.
    pub const MAX_PAGE_SIZE: u32 = 100;

    /// Creates a client over `transport` using the built-in queries.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            catalog: QueryCatalog::github(),
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets the commit page size.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Configuration`] unless `page_size` is within
    /// `1..=100`.
    pub fn with_page_size(mut self, page_size: u32) -> Result<Self, FetchError> {
        if !(1..=Self::MAX_PAGE_SIZE).contains(&page_size) {
            return Err(FetchError::Configuration {
                message: format!(
                    "page size must be between 1 and {}, got {page_size}",
                    Self::MAX_PAGE_SIZE
                ),
            });
        }
        self.page_size = page_size;
        Ok(self)
    }

    /// Replaces the query catalogue.
    #[must_use]
    pub const fn with_catalog(mut self, catalog: QueryCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Configured commit page size.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Borrow the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Lists the pull requests whose head branch is `reference`.
    ///
    /// # Errors
    ///
    /// Propagates transport failures and returns the normaliser's errors for
    /// malformed or unrecognised data.
    pub async fn find_by_reference_name(
        &self,
        owner: &RepositoryOwner,
        repository: &RepositoryName,
        reference: &ReferenceName,
    ) -> Result<Vec<PullRequestInformation>, FetchError> {
        let definition = self.definition(QueryId::FindPullRequestsInfoByReferenceName)?;
        let variables = repository_variables(owner, repository)
            .with_string(variable::REFERENCE_NAME, reference.as_str());

        let data = self.transport.execute(definition, &variables).await?;
        let pull_requests = normalize::by_reference(data, owner, repository)?;
        tracing::debug!(
            reference = reference.as_str(),
            count = pull_requests.len(),
            "resolved pull requests by reference"
        );
        Ok(pull_requests)
    }

    /// Fetches one pull request by number.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] when GitHub reports no such pull
    /// request, plus any transport or normaliser error.
    pub async fn find_by_number(
        &self,
        owner: &RepositoryOwner,
        repository: &RepositoryName,
        number: PullRequestNumber,
    ) -> Result<PullRequestInformation, FetchError> {
        let definition = self.definition(QueryId::FindPullRequestInfoByNumber)?;
        let variables = number_variables(owner, repository, number)?;

        let data = self.transport.execute(definition, &variables).await?;
        normalize::by_number(data, owner, repository, number)
    }

    /// Opens a lazy stream over the pull request's commits.
    ///
    /// Nothing is requested until the first [`CommitStream::next_commit`]
    /// call.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::UnknownQuery`] when the catalogue lacks the
    /// commits query.
    pub fn find_commits(
        &self,
        owner: &RepositoryOwner,
        repository: &RepositoryName,
        number: PullRequestNumber,
    ) -> Result<CommitStream<'_, T>, FetchError> {
        let definition = self.definition(QueryId::FindPullRequestCommits)?;
        let variables = number_variables(owner, repository, number)?;
        Ok(CommitStream {
            pages: Paginator::new(
                &self.transport,
                definition,
                variables,
                self.page_size,
                normalize::commit_connection,
            ),
        })
    }

    fn definition(&self, id: QueryId) -> Result<&'static QueryDefinition, FetchError> {
        self.catalog.definition(id)
    }
}

/// Lazy, forward-only sequence of a pull request's commits.
///
/// Dropping the stream abandons the walk; no request outlives the call that
/// triggered it.
pub struct CommitStream<'client, T: ?Sized> {
    pages: Paginator<'client, T>,
}

impl<T: GraphQlTransport + ?Sized> CommitStream<'_, T> {
    /// Yields the next commit, fetching the next page when the current one
    /// is used up. Returns `None` once the connection is exhausted or after
    /// an error has been returned.
    pub async fn next_commit(&mut self) -> Option<Result<CommitNode, FetchError>> {
        let commit = self.pages.next_edge().await?.and_then(normalize::commit_node);
        if commit.is_err() {
            self.pages.finish();
        }
        Some(commit)
    }

    /// Drains the stream.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; commits read before it are
    /// discarded.
    pub async fn collect_all(mut self) -> Result<Vec<CommitNode>, FetchError> {
        let mut commits = Vec::new();
        while let Some(commit) = self.next_commit().await {
            commits.push(commit?);
        }
        Ok(commits)
    }

    /// Number of pages requested so far.
    #[must_use]
    pub const fn pages_fetched(&self) -> u32 {
        self.pages.pages_fetched()
    }
}

fn repository_variables(owner: &RepositoryOwner, repository: &RepositoryName) -> Variables {
    Variables::new()
        .with_string(variable::REPOSITORY_OWNER, owner.as_str())
        .with_string(variable::REPOSITORY_NAME, repository.as_str())
}

fn number_variables(
    owner: &RepositoryOwner,
    repository: &RepositoryName,
    number: PullRequestNumber,
) -> Result<Variables, FetchError> {
    let value = i64::try_from(number.get()).map_err(|_| FetchError::InvalidPullRequestNumber)?;
    Ok(repository_variables(owner, repository).with_int(variable::PULL_REQUEST_NUMBER, value))
}
