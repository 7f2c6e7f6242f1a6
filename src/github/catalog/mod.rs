//! Immutable registry of the GraphQL queries this client can run.
//!
//! Every definition is a `const` value, so the catalogue needs no
//! initialisation and can be shared across threads without synchronisation.

mod queries;

use std::fmt;

use super::error::FetchError;

pub use queries::{
    FIND_PULL_REQUEST_COMMITS, FIND_PULL_REQUEST_INFO_BY_NUMBER,
    FIND_PULL_REQUESTS_INFO_BY_REFERENCE_NAME,
};

/// Variable names shared by the documents.
pub mod variable {
    /// `$repositoryOwner: String!`
    pub const REPOSITORY_OWNER: &str = "repositoryOwner";
    /// `$repositoryName: String!`
    pub const REPOSITORY_NAME: &str = "repositoryName";
    /// `$referenceName: String!`
    pub const REFERENCE_NAME: &str = "referenceName";
    /// `$pullRequestNumber: Int!`
    pub const PULL_REQUEST_NUMBER: &str = "pullRequestNumber";
    /// `$pageSize: Int!`
    pub const PAGE_SIZE: &str = "pageSize";
    /// `$endCursor: String`
    pub const END_CURSOR: &str = "endCursor";
}

/// GraphQL scalar type of a declared variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    /// `String`
    String,
    /// `Int`
    Int,
}

impl VariableType {
    /// GraphQL spelling of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Int => "Int",
        }
    }
}

/// One variable declared by a query document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableSpec {
    /// Variable name without the leading `$`.
    pub name: &'static str,
    /// Declared scalar type.
    pub kind: VariableType,
    /// Whether the declaration is non-null (`!`).
    pub required: bool,
}

impl VariableSpec {
    const fn required(name: &'static str, kind: VariableType) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    const fn optional(name: &'static str, kind: VariableType) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// Identifiers of the registered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryId {
    /// Pull requests by head branch.
    FindPullRequestsInfoByReferenceName,
    /// A single pull request by number.
    FindPullRequestInfoByNumber,
    /// A page of commits for a pull request.
    FindPullRequestCommits,
}

impl QueryId {
    /// GraphQL operation name.
    #[must_use]
    pub const fn operation_name(self) -> &'static str {
        match self {
            Self::FindPullRequestsInfoByReferenceName => "FindPullRequestsInfoByReferenceName",
            Self::FindPullRequestInfoByNumber => "FindPullRequestInfoByNumber",
            Self::FindPullRequestCommits => "FindPullRequestCommits",
        }
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation_name())
    }
}

/// A query document together with its variable declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDefinition {
    id: QueryId,
    document: &'static str,
    variables: &'static [VariableSpec],
}

impl QueryDefinition {
    /// Creates a definition.
    #[must_use]
    pub const fn new(
        id: QueryId,
        document: &'static str,
        variables: &'static [VariableSpec],
    ) -> Self {
        Self {
            id,
            document,
            variables,
        }
    }

    /// Query identifier.
    #[must_use]
    pub const fn id(&self) -> QueryId {
        self.id
    }

    /// GraphQL document text.
    #[must_use]
    pub const fn document(&self) -> &'static str {
        self.document
    }

    /// Declared variables in document order.
    #[must_use]
    pub const fn variables(&self) -> &'static [VariableSpec] {
        self.variables
    }

    /// Looks up a declared variable by name.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&'static VariableSpec> {
        self.variables.iter().find(|variable| variable.name == name)
    }
}

const REFERENCE_NAME_VARIABLES: &[VariableSpec] = &[
    VariableSpec::required(variable::REPOSITORY_OWNER, VariableType::String),
    VariableSpec::required(variable::REPOSITORY_NAME, VariableType::String),
    VariableSpec::required(variable::REFERENCE_NAME, VariableType::String),
];

const NUMBER_VARIABLES: &[VariableSpec] = &[
    VariableSpec::required(variable::REPOSITORY_OWNER, VariableType::String),
    VariableSpec::required(variable::REPOSITORY_NAME, VariableType::String),
    VariableSpec::required(variable::PULL_REQUEST_NUMBER, VariableType::Int),
];

const COMMIT_VARIABLES: &[VariableSpec] = &[
    VariableSpec::required(variable::REPOSITORY_OWNER, VariableType::String),
    VariableSpec::required(variable::REPOSITORY_NAME, VariableType::String),
    VariableSpec::required(variable::PULL_REQUEST_NUMBER, VariableType::Int),
    VariableSpec::required(variable::PAGE_SIZE, VariableType::Int),
    VariableSpec::optional(variable::END_CURSOR, VariableType::String),
];

const GITHUB_QUERIES: &[QueryDefinition] = &[
    QueryDefinition::new(
        QueryId::FindPullRequestsInfoByReferenceName,
        FIND_PULL_REQUESTS_INFO_BY_REFERENCE_NAME,
        REFERENCE_NAME_VARIABLES,
    ),
    QueryDefinition::new(
        QueryId::FindPullRequestInfoByNumber,
        FIND_PULL_REQUEST_INFO_BY_NUMBER,
        NUMBER_VARIABLES,
    ),
    QueryDefinition::new(
        QueryId::FindPullRequestCommits,
        FIND_PULL_REQUEST_COMMITS,
        COMMIT_VARIABLES,
    ),
];

/// Read-only lookup table of query definitions.
#[derive(Debug, Clone, Copy)]
pub struct QueryCatalog {
    definitions: &'static [QueryDefinition],
}

impl QueryCatalog {
    /// Catalogue over an arbitrary static table.
    #[must_use]
    pub const fn new(definitions: &'static [QueryDefinition]) -> Self {
        Self { definitions }
    }

    /// The three pull request queries.
    #[must_use]
    pub const fn github() -> Self {
        Self::new(GITHUB_QUERIES)
    }

    /// Resolves a definition by operation name.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::UnknownQuery`] when no definition carries `name`.
    pub fn get(&self, name: &str) -> Result<&'static QueryDefinition, FetchError> {
        self.definitions
            .iter()
            .find(|definition| definition.id.operation_name() == name)
            .ok_or_else(|| FetchError::UnknownQuery {
                id: name.to_owned(),
            })
    }

    /// Resolves a definition by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::UnknownQuery`] when this catalogue does not
    /// register `id`.
    pub fn definition(&self, id: QueryId) -> Result<&'static QueryDefinition, FetchError> {
        self.get(id.operation_name())
    }

    /// Iterates over every registered definition.
    pub fn iter(&self) -> impl Iterator<Item = &'static QueryDefinition> {
        self.definitions.iter()
    }
}

impl Default for QueryCatalog {
    fn default() -> Self {
        Self::github()
    }
}
