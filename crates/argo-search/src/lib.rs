//! # argo-search
//!
//! Query translation and document access for Argo.
//!
//! - [`query`]: turns request parameters into a [`SearchQuery`] using a
//!   resource's declared filter, search and ordering fields
//! - [`backend`]: the [`SearchBackend`] seam with an Elasticsearch client and
//!   an in-memory implementation over fixture documents
//! - [`accessor`]: list and single-document retrieval against one index

pub mod accessor;
pub mod backend;
pub mod query;

mod error;
mod http;
mod ordinal;

pub use accessor::DocumentAccessor;
pub use backend::{
    AnyBackend, ElasticsearchBackend, Hit, MemoryBackend, SearchBackend, SearchResults,
};
pub use error::{QueryError, SearchError};
pub use query::{
    FieldKind, FilterField, Lookup, OrderingField, PageLimits, QueryBuilder, ResourceFields,
    SearchQuery,
};
