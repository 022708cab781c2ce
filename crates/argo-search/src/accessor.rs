//! List and single-document access against one index.

use crate::backend::{Hit, SearchBackend, SearchResults};
use crate::error::SearchError;
use crate::query::SearchQuery;

/// Executes queries for one resource's index.
#[derive(Debug)]
pub struct DocumentAccessor<'a, B> {
    backend: &'a B,
    index: &'a str,
}

impl<'a, B: SearchBackend> DocumentAccessor<'a, B> {
    #[must_use]
    pub const fn new(backend: &'a B, index: &'a str) -> Self {
        Self { backend, index }
    }

    #[must_use]
    pub const fn index(&self) -> &str {
        self.index
    }

    /// Fail with [`SearchError::IndexNotFound`] unless the index exists.
    ///
    /// # Errors
    ///
    /// Also propagates backend failures from the existence check.
    pub async fn ensure_index(&self) -> Result<(), SearchError> {
        if self.backend.index_exists(self.index).await? {
            Ok(())
        } else {
            Err(SearchError::IndexNotFound(self.index.to_string()))
        }
    }

    /// Run a list query and return the page of hits with the total count.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the index is missing or the backend fails.
    pub async fn list(&self, query: &SearchQuery) -> Result<SearchResults, SearchError> {
        self.backend.search(self.index, query).await
    }

    /// Fetch the single document with identifier `id`.
    ///
    /// # Errors
    ///
    /// - [`SearchError::NoMatch`] if nothing matches
    /// - [`SearchError::AmbiguousMatch`] if more than one document carries the
    ///   identifier; no hit is returned in that case
    pub async fn retrieve(&self, id: &str) -> Result<Hit, SearchError> {
        let results = self.backend.search(self.index, &SearchQuery::by_id(id)).await?;
        let count = usize::try_from(results.total)
            .unwrap_or(usize::MAX)
            .max(results.hits.len());
        let mut hits = results.hits.into_iter();
        match (hits.next(), count) {
            (Some(hit), 1) => Ok(hit),
            (None, _) | (Some(_), 0) => Err(SearchError::NoMatch {
                index: self.index.to_string(),
                id: id.to_string(),
            }),
            (Some(_), count) => {
                tracing::warn!(index = self.index, id, count, "identifier is not unique");
                Err(SearchError::AmbiguousMatch {
                    index: self.index.to_string(),
                    id: id.to_string(),
                    count,
                })
            }
        }
    }
}
