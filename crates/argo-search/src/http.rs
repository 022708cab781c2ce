//! Shared HTTP response helpers for the Elasticsearch client.
//!
//! Keeps status-code handling in one place so the backend only builds
//! requests and maps response bodies.

use crate::error::SearchError;

/// Check a search backend response for error statuses.
///
/// Returns the response unchanged on success. Handles:
/// - **404 Not Found** → [`SearchError::IndexNotFound`] for `index`.
/// - **502/503/504** → [`SearchError::Unavailable`]; the cluster is up but
///   cannot serve the request.
/// - **Other non-success status** → [`SearchError::Api`] with status code and
///   response body.
pub async fn check_response(
    resp: reqwest::Response,
    index: &str,
) -> Result<reqwest::Response, SearchError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(SearchError::IndexNotFound(index.to_string()));
    }
    let message = resp.text().await.unwrap_or_default();
    if matches!(status.as_u16(), 502..=504) {
        return Err(SearchError::Unavailable(format!(
            "{status} from search backend: {message}"
        )));
    }
    Err(SearchError::Api {
        status: status.as_u16(),
        message,
    })
}
