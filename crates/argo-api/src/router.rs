//! HTTP routes.
//!
//! - `GET /` lists the resource endpoints
//! - `GET /schema/` describes them
//! - `GET /{plural}/` and `GET /{plural}/{id}/` per resource kind, with or
//!   without the trailing slash

use std::sync::Arc;

use argo_core::ResourceKind;
use argo_core::responses::{DetailDocument, ListEntry, Page};
use argo_search::SearchBackend;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Map, Value};

use crate::endpoint::ResourceEndpoint;
use crate::error::ApiError;
use crate::schema::{ApiSchema, api_schema};
use crate::state::AppState;

type Shared<B> = Arc<AppState<B>>;

/// Build the application router over `state`.
pub fn router<B>(state: Shared<B>) -> Router
where
    B: SearchBackend + 'static,
{
    let mut router: Router<Shared<B>> = Router::new()
        .route("/", get(api_root::<B>))
        .route("/schema", get(schema::<B>))
        .route("/schema/", get(schema::<B>));

    for kind in ResourceKind::ALL {
        let list = move |State(state): State<Shared<B>>,
                         Query(params): Query<Vec<(String, String)>>| async move {
            list_resource(&state, kind, &params).await
        };
        let detail = move |State(state): State<Shared<B>>, Path(id): Path<String>| async move {
            retrieve_resource(&state, kind, &id).await
        };

        let base = format!("/{}", kind.plural());
        router = router
            .route(&base, get(list))
            .route(&format!("{base}/"), get(list))
            .route(&format!("{base}/:id"), get(detail))
            .route(&format!("{base}/:id/"), get(detail));
    }

    router.with_state(state)
}

async fn list_resource<B: SearchBackend>(
    state: &AppState<B>,
    kind: ResourceKind,
    params: &[(String, String)],
) -> Result<Json<Page<ListEntry>>, ApiError> {
    let endpoint = ResourceEndpoint::bind(state, kind);
    match endpoint.list(params).await {
        Ok(page) => {
            tracing::info!(
                resource = kind.plural(),
                index = endpoint.index(),
                count = page.count,
                returned = page.results.len(),
                "list"
            );
            Ok(Json(page))
        }
        Err(e) => {
            log_failure(kind, "list", &e);
            Err(e)
        }
    }
}

async fn retrieve_resource<B: SearchBackend>(
    state: &AppState<B>,
    kind: ResourceKind,
    id: &str,
) -> Result<Json<DetailDocument>, ApiError> {
    let endpoint = ResourceEndpoint::bind(state, kind);
    match endpoint.retrieve(id).await {
        Ok(document) => {
            tracing::info!(resource = kind.plural(), id, "retrieve");
            Ok(Json(document))
        }
        Err(e) => {
            log_failure(kind, "retrieve", &e);
            Err(e)
        }
    }
}

fn log_failure(kind: ResourceKind, operation: &str, err: &ApiError) {
    let status = err.status().as_u16();
    if err.status().is_server_error() {
        tracing::error!(resource = kind.plural(), operation, status, %err, "request failed");
    } else {
        tracing::info!(resource = kind.plural(), operation, status, %err, "request rejected");
    }
}

async fn api_root<B>(State(state): State<Shared<B>>) -> Json<Value> {
    let links: Map<String, Value> = state
        .registry
        .iter()
        .map(|config| {
            let kind = config.kind;
            (
                kind.plural().to_string(),
                Value::String(format!("{}{}", state.base_url, kind.list_path())),
            )
        })
        .collect();
    Json(Value::Object(links))
}

async fn schema<B>(State(state): State<Shared<B>>) -> Json<ApiSchema> {
    Json(api_schema(&state.registry))
}
