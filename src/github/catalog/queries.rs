//! GraphQL documents sent to GitHub.

/// Pull requests whose head branch matches `$referenceName`.
pub const FIND_PULL_REQUESTS_INFO_BY_REFERENCE_NAME: &str = r"
  query FindPullRequestsInfoByReferenceName($repositoryOwner: String!, $repositoryName: String!, $referenceName: String!) {
    repository(owner: $repositoryOwner, name: $repositoryName) {
      pullRequests(headRefName: $referenceName, first: 10) {
        nodes {
          author {
            login
          }
          commits(last: 1) {
            edges {
              node {
                commit {
                  message
                  messageHeadline
                }
              }
            }
          }
          id
          mergeStateStatus
          mergeable
          merged
          number
          reviews(last: 100) {
            edges {
              node {
                state
              }
            }
          }
          state
          title
        }
      }
    }
  }
";

/// A single pull request by number.
pub const FIND_PULL_REQUEST_INFO_BY_NUMBER: &str = r"
  query FindPullRequestInfoByNumber($repositoryOwner: String!, $repositoryName: String!, $pullRequestNumber: Int!) {
    repository(owner: $repositoryOwner, name: $repositoryName) {
      pullRequest(number: $pullRequestNumber) {
        author {
          login
        }
        commits(last: 1) {
          edges {
            node {
              commit {
                message
                messageHeadline
              }
            }
          }
        }
        id
        mergeStateStatus
        mergeable
        merged
        number
        reviews(last: 100) {
          edges {
            node {
              state
            }
          }
        }
        state
        title
      }
    }
  }
";

/// One page of a pull request's commits.
pub const FIND_PULL_REQUEST_COMMITS: &str = r"
  query FindPullRequestCommits($repositoryOwner: String!, $repositoryName: String!, $pullRequestNumber: Int!, $pageSize: Int!, $endCursor: String) {
    repository(owner: $repositoryOwner, name: $repositoryName) {
      pullRequest(number: $pullRequestNumber) {
        commits(first: $pageSize, after: $endCursor) {
          edges {
            node {
              commit {
                author {
                  user {
                    login
                  }
                }
                signature {
                  isValid
                }
              }
            }
          }
          pageInfo {
            endCursor
            hasNextPage
          }
        }
      }
    }
  }
";
