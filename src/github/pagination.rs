//! Cursor-based pagination over GraphQL connection fields.
//!
//! A [`Paginator`] walks one connection (for example a pull request's
//! `commits`) page by page. It is pull-driven: a page is requested only when
//! the caller asks for an edge and every edge from the previous page has been
//! handed out, so dropping the paginator at any point leaves no request in
//! flight.

use std::collections::VecDeque;

use serde::Deserialize;
use serde_json::Value;

use super::catalog::{QueryDefinition, variable};
use super::error::FetchError;
use super::transport::GraphQlTransport;
use super::variables::Variables;

/// Position marker returned with every page of a connection.
///
/// `end_cursor` is an opaque token; it is only ever echoed back to GitHub.
///
/// # Example
///
/// ```
/// use prfetch::github::pagination::PageInfo;
///
/// let info = PageInfo::new(Some("Y3Vyc29yOjUw".to_owned()), true);
/// assert!(info.has_next_page());
/// assert!(!PageInfo::last().has_next_page());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    end_cursor: Option<String>,
    has_next_page: bool,
}

impl PageInfo {
    /// Creates a page info instance.
    #[must_use]
    pub const fn new(end_cursor: Option<String>, has_next_page: bool) -> Self {
        Self {
            end_cursor,
            has_next_page,
        }
    }

    /// Page info for a terminal page.
    #[must_use]
    pub const fn last() -> Self {
        Self::new(None, false)
    }

    /// Cursor of the last edge on this page.
    #[must_use]
    pub fn end_cursor(&self) -> Option<&str> {
        self.end_cursor.as_deref()
    }

    /// Returns true if more pages exist after this one.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.has_next_page
    }
}

/// One page of a connection with its edges left untyped.
#[derive(Debug, Clone, PartialEq)]
pub struct RawConnection {
    /// Edges in server order.
    pub edges: Vec<Value>,
    /// Continuation state.
    pub page_info: PageInfo,
}

/// Extracts the paginated connection from a response's `data` tree.
pub type ConnectionSelector = fn(Value) -> Result<RawConnection, FetchError>;

/// Lazy, forward-only walk over a connection's edges.
pub struct Paginator<'transport, Transport: ?Sized> {
    transport: &'transport Transport,
    definition: &'static QueryDefinition,
    variables: Variables,
    select: ConnectionSelector,
    pending: VecDeque<Value>,
    cursor: Option<String>,
    pages_fetched: u32,
    finished: bool,
}

impl<'transport, Transport> Paginator<'transport, Transport>
where
    Transport: GraphQlTransport + ?Sized,
{
    /// Prepares a walk. No request is made until the first edge is pulled.
    ///
    /// `base_variables` must hold everything the query needs except
    /// `pageSize` and `endCursor`, which the paginator manages.
    #[must_use]
    pub fn new(
        transport: &'transport Transport,
        definition: &'static QueryDefinition,
        base_variables: Variables,
        page_size: u32,
        select: ConnectionSelector,
    ) -> Self {
        let mut variables = base_variables.with_int(variable::PAGE_SIZE, i64::from(page_size));
        variables.set_cursor(variable::END_CURSOR, None);
        Self {
            transport,
            definition,
            variables,
            select,
            pending: VecDeque::new(),
            cursor: None,
            pages_fetched: 0,
            finished: false,
        }
    }

    /// Number of pages requested so far.
    #[must_use]
    pub const fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Yields the next edge, fetching further pages as needed.
    ///
    /// Returns `None` once the server reports no further pages and every
    /// buffered edge has been handed out. After an error the paginator is
    /// finished and keeps returning `None`.
    pub async fn next_edge(&mut self) -> Option<Result<Value, FetchError>> {
        loop {
            if let Some(edge) = self.pending.pop_front() {
                return Some(Ok(edge));
            }
            if self.finished {
                return None;
            }
            if let Err(error) = self.fetch_page().await {
                self.finish();
                return Some(Err(error));
            }
        }
    }

    /// Stops the walk: buffered edges are dropped and no further page is
    /// requested.
    pub fn finish(&mut self) {
        self.finished = true;
        self.pending.clear();
    }

    async fn fetch_page(&mut self) -> Result<(), FetchError> {
        self.variables
            .set_cursor(variable::END_CURSOR, self.cursor.as_deref());
        let data = self
            .transport
            .execute(self.definition, &self.variables)
            .await?;
        self.pages_fetched = self.pages_fetched.saturating_add(1);

        let RawConnection { edges, page_info } = (self.select)(data)?;
        tracing::debug!(
            query = %self.definition.id(),
            page = self.pages_fetched,
            edges = edges.len(),
            has_next_page = page_info.has_next_page(),
            "fetched connection page"
        );

        if page_info.has_next_page() {
            let Some(cursor) = page_info.end_cursor else {
                return Err(FetchError::decode(
                    "pageInfo.hasNextPage is true but endCursor is missing",
                ));
            };
            self.cursor = Some(cursor);
        } else {
            self.finished = true;
        }

        self.pending.extend(edges);
        Ok(())
    }
}
