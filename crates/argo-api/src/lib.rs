//! # argo-api
//!
//! The read-only HTTP API over archival resources.
//!
//! - [`resources`]: static filter, search and ordering declarations per
//!   resource kind, validated into a [`ResourceRegistry`]
//! - [`shape`]: list and detail shaping of stored documents
//! - [`endpoint`]: list and retrieve, composing query building, document
//!   access and shaping
//! - [`router`]: the axum routes, including the API root and `/schema/`

pub mod endpoint;
pub mod resources;
pub mod router;
pub mod schema;
pub mod shape;

mod error;
mod state;

pub use endpoint::ResourceEndpoint;
pub use error::ApiError;
pub use resources::{ResourceConfig, ResourceRegistry};
pub use router::router;
pub use shape::{ShapeError, Shaper};
pub use state::AppState;
