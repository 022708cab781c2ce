//! Error taxonomy of the HTTP surface.

use argo_search::{QueryError, SearchError};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::shape::ShapeError;

/// An error returned to API clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// A request parameter was rejected before any backend call.
    #[error("{message}")]
    BadRequest { parameter: String, message: String },

    /// Missing index, unknown identifier, ambiguous identifier or a page past
    /// the end of the results.
    #[error("{0}")]
    NotFound(String),

    /// The search backend could not be reached or timed out.
    #[error("{0}")]
    Unavailable(String),

    /// The search backend answered with an error or an unreadable body.
    #[error("{0}")]
    Backend(String),

    /// A stored document could not be shaped into its response form.
    #[error("document `{id}` is malformed: {message}")]
    DataIntegrity { id: String, message: String },
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
            Self::DataIntegrity { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub fn invalid_page() -> Self {
        Self::NotFound("Invalid page.".to_string())
    }
}

/// JSON error body: `{"detail": ...}` plus `parameter` for rejected requests.
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameter: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let parameter = match &self {
            Self::BadRequest { parameter, .. } => Some(parameter.clone()),
            _ => None,
        };
        let body = ErrorBody {
            detail: self.to_string(),
            parameter,
        };
        (status, Json(body)).into_response()
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        Self::BadRequest {
            parameter: err.parameter().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::IndexNotFound(index) => {
                Self::NotFound(format!("Index `{index}` does not exist"))
            }
            SearchError::NoMatch { .. } => {
                Self::NotFound("No result matches the given query.".to_string())
            }
            SearchError::AmbiguousMatch { .. } => Self::NotFound(
                "Multiple results match the given query. Expected a single result.".to_string(),
            ),
            SearchError::Unavailable(message) => Self::Unavailable(message),
            other @ (SearchError::Http(_)
            | SearchError::Api { .. }
            | SearchError::Parse(_)
            | SearchError::Fixtures(_)) => Self::Backend(other.to_string()),
        }
    }
}

impl From<ShapeError> for ApiError {
    fn from(err: ShapeError) -> Self {
        Self::DataIntegrity {
            id: err.id,
            message: err.message,
        }
    }
}
