//! Search backends.
//!
//! [`SearchBackend`] is the seam between the API and the document store.
//! [`ElasticsearchBackend`] talks to a cluster over HTTP; [`MemoryBackend`]
//! evaluates the same queries over JSON documents held in process.

mod elasticsearch;
mod memory;

pub use elasticsearch::ElasticsearchBackend;
pub use memory::MemoryBackend;

use std::future::Future;
use std::path::Path;

use argo_config::{ArgoConfig, BackendKind};
use serde_json::Value;

use crate::error::SearchError;
use crate::query::SearchQuery;

/// One matching document.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    /// Document identifier (`_id`).
    pub id: String,
    /// Stored document body (`_source`).
    pub source: Value,
    /// Relevance score, when the query had a text component.
    pub score: Option<f64>,
}

/// A page of hits plus the total number of matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub total: u64,
    pub hits: Vec<Hit>,
}

/// A read-only document store that can execute [`SearchQuery`]s.
///
/// Implementations are shared across concurrent requests.
pub trait SearchBackend: Send + Sync {
    /// Whether `index` exists.
    fn index_exists(&self, index: &str) -> impl Future<Output = Result<bool, SearchError>> + Send;

    /// Execute `query` against `index`.
    fn search(
        &self,
        index: &str,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<SearchResults, SearchError>> + Send;
}

/// The backend selected by configuration.
#[derive(Debug, Clone)]
pub enum AnyBackend {
    Elasticsearch(ElasticsearchBackend),
    Memory(MemoryBackend),
}

impl AnyBackend {
    /// Build the backend named by `backend.kind`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the HTTP client cannot be built or the
    /// fixtures directory cannot be read.
    pub fn from_config(config: &ArgoConfig) -> Result<Self, SearchError> {
        match config.backend.kind {
            BackendKind::Elasticsearch => Ok(Self::Elasticsearch(ElasticsearchBackend::new(
                &config.elasticsearch,
            )?)),
            BackendKind::Fixtures => Ok(Self::Memory(MemoryBackend::from_fixtures_dir(
                Path::new(&config.backend.fixtures_dir),
            )?)),
        }
    }

    /// Short name for logs and CLI output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Elasticsearch(_) => "elasticsearch",
            Self::Memory(_) => "fixtures",
        }
    }
}

impl SearchBackend for AnyBackend {
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        match self {
            Self::Elasticsearch(backend) => backend.index_exists(index).await,
            Self::Memory(backend) => backend.index_exists(index).await,
        }
    }

    async fn search(&self, index: &str, query: &SearchQuery) -> Result<SearchResults, SearchError> {
        match self {
            Self::Elasticsearch(backend) => backend.search(index, query).await,
            Self::Memory(backend) => backend.search(index, query).await,
        }
    }
}

impl From<MemoryBackend> for AnyBackend {
    fn from(backend: MemoryBackend) -> Self {
        Self::Memory(backend)
    }
}

impl From<ElasticsearchBackend> for AnyBackend {
    fn from(backend: ElasticsearchBackend) -> Self {
        Self::Elasticsearch(backend)
    }
}
