//! Read operations of one resource: list and retrieve.

use argo_core::ResourceKind;
use argo_core::responses::{DetailDocument, ListEntry, Page};
use argo_search::{DocumentAccessor, QueryBuilder, SearchBackend};

use crate::error::ApiError;
use crate::resources::ResourceConfig;
use crate::shape::Shaper;
use crate::state::AppState;

/// One resource kind bound to its configuration, index and shaper.
///
/// Request parameters are validated before the backend is contacted. Every
/// operation then checks that the bound index exists and fails with Not
/// Found if it does not.
pub struct ResourceEndpoint<'a, B> {
    state: &'a AppState<B>,
    config: &'a ResourceConfig,
    index: String,
    shaper: Shaper,
}

impl<'a, B: SearchBackend> ResourceEndpoint<'a, B> {
    #[must_use]
    pub fn bind(state: &'a AppState<B>, kind: ResourceKind) -> Self {
        Self {
            state,
            config: state.registry.get(kind),
            index: state.index_for(kind),
            shaper: Shaper::for_kind(kind),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.config.kind
    }

    #[must_use]
    pub fn index(&self) -> &str {
        &self.index
    }

    /// A page of documents in list shape.
    ///
    /// # Errors
    ///
    /// - [`ApiError::BadRequest`] for an unknown filter, lookup, ordering or
    ///   malformed pagination
    /// - [`ApiError::NotFound`] if the index is missing or the page is past
    ///   the end of the results
    /// - [`ApiError::Unavailable`] or [`ApiError::Backend`] for backend
    ///   failures
    pub async fn list(&self, params: &[(String, String)]) -> Result<Page<ListEntry>, ApiError> {
        let query = QueryBuilder::new(&self.config.fields, self.state.limits).build(params)?;

        let accessor = DocumentAccessor::new(&self.state.backend, &self.index);
        accessor.ensure_index().await?;
        let results = accessor.list(&query).await?;

        let offset = query.from as u64;
        if query.page > 1 && offset >= results.total {
            return Err(ApiError::invalid_page());
        }

        let next = (offset + (results.hits.len() as u64) < results.total)
            .then(|| self.page_link(params, query.page + 1));
        let previous = (query.page > 1).then(|| self.page_link(params, query.page - 1));
        let results_page = results
            .hits
            .iter()
            .map(|hit| self.shaper.list_entry(hit))
            .collect();

        Ok(Page {
            count: results.total,
            next,
            previous,
            results: results_page,
        })
    }

    /// The document with identifier `id` in detail shape.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotFound`] if the index is missing or `id` matches zero
    ///   or several documents
    /// - [`ApiError::DataIntegrity`] if the stored document is malformed
    /// - [`ApiError::Unavailable`] or [`ApiError::Backend`] for backend
    ///   failures
    pub async fn retrieve(&self, id: &str) -> Result<DetailDocument, ApiError> {
        let accessor = DocumentAccessor::new(&self.state.backend, &self.index);
        accessor.ensure_index().await?;
        let hit = accessor.retrieve(id).await?;
        Ok(self.shaper.detail(&hit)?)
    }

    /// Link to the list with the request's parameters and another page.
    ///
    /// Page 1 is expressed by dropping the `page` parameter.
    fn page_link(&self, params: &[(String, String)], page: usize) -> String {
        let mut pairs: Vec<(&str, String)> = params
            .iter()
            .filter(|(key, _)| key != "page")
            .map(|(key, value)| (key.as_str(), value.clone()))
            .collect();
        if page > 1 {
            pairs.push(("page", page.to_string()));
        }

        let path = format!("{}{}", self.state.base_url, self.config.kind.list_path());
        if pairs.is_empty() {
            return path;
        }
        let query: Vec<String> = pairs
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect();
        format!("{path}?{}", query.join("&"))
    }
}
