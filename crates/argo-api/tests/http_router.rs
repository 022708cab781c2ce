//! The axum router served on an ephemeral port and driven over HTTP.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use argo_api::{AppState, ResourceRegistry, router};
use argo_config::ArgoConfig;
use argo_search::MemoryBackend;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use rstest::rstest;
use serde_json::Value;

async fn serve(backend: MemoryBackend) -> SocketAddr {
    let mut config = ArgoConfig::default();
    config.server.base_url = "http://archive.test".into();
    let state = Arc::new(AppState::new(
        backend,
        ResourceRegistry::builtin().unwrap(),
        &config,
    ));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    addr
}

async fn serve_fixtures() -> SocketAddr {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    serve(MemoryBackend::from_fixtures_dir(&dir).unwrap()).await
}

async fn get(addr: SocketAddr, path: &str) -> (StatusCode, Value) {
    let resp = reqwest::get(format!("http://{addr}{path}")).await.unwrap();
    let status = resp.status();
    let body = resp.json::<Value>().await.unwrap();
    (status, body)
}

#[rstest]
#[case("/agents/")]
#[case("/agents")]
#[tokio::test]
async fn list_with_and_without_trailing_slash(#[case] path: &str) {
    let addr = serve_fixtures().await;
    let (status, body) = get(addr, path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert!(body["next"].is_null());
    assert!(body["previous"].is_null());
    assert_eq!(body["results"].as_array().unwrap().len(), 3);
}

#[rstest]
#[case("/objects/obj-1/")]
#[case("/objects/obj-1")]
#[tokio::test]
async fn detail_with_and_without_trailing_slash(#[case] path: &str) {
    let addr = serve_fixtures().await;
    let (status, body) = get(addr, path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["uri"], "/objects/obj-1/");
    assert_eq!(body["id"], "obj-1");
    assert_eq!(body["title"], "Photograph of Kykuit");
    assert!(body["rights_statements"].is_null());
}

#[tokio::test]
async fn list_items_carry_dates_except_for_terms() {
    let addr = serve_fixtures().await;

    let (_, collections) = get(addr, "/collections/?level=item").await;
    let item = &collections["results"][0];
    assert_eq!(item["uri"], "/collections/c-2/");
    assert_eq!(item["type"], "collection");
    assert_eq!(item["dates"][0]["expression"], "1923");

    let (_, terms) = get(addr, "/terms/?ordering=-title").await;
    let first = &terms["results"][0];
    assert_eq!(first["uri"], "/terms/t-2/");
    assert!(first.get("dates").is_none());
}

#[tokio::test]
async fn pagination_links_use_the_configured_base_url() {
    let addr = serve_fixtures().await;
    let (status, body) = get(addr, "/objects/?page_size=1&ordering=title").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(
        body["next"],
        "http://archive.test/objects/?page_size=1&ordering=title&page=2"
    );
}

#[rstest]
#[case("/agents/?colour=red", "colour")]
#[case("/agents/?title__gt=A", "title__gt")]
#[case("/agents/?ordering=-colour", "ordering")]
#[case("/agents/?page=0", "page")]
#[case("/agents/?page_size=abc", "page_size")]
#[case("/agents/?start_date__gte=yesterday", "start_date__gte")]
#[case("/agents/?start_date__range=1800,1850", "start_date__range")]
#[case("/agents/?page=600", "page")]
#[tokio::test]
async fn rejected_parameters_are_bad_requests(#[case] path: &str, #[case] parameter: &str) {
    let addr = serve_fixtures().await;
    let (status, body) = get(addr, path).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["parameter"], parameter);
    assert!(body["detail"].is_string());
}

#[rstest]
#[case("/agents/ag-404/", "No result matches the given query.")]
#[case("/terms/?page=5", "Invalid page.")]
#[tokio::test]
async fn missing_documents_and_pages_are_not_found(#[case] path: &str, #[case] detail: &str) {
    let addr = serve_fixtures().await;
    let (status, body) = get(addr, path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], detail);
    assert!(body.get("parameter").is_none());
}

#[tokio::test]
async fn missing_index_is_not_found() {
    let addr = serve(MemoryBackend::new()).await;
    let (status, body) = get(addr, "/terms/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Index `terms` does not exist");
}

#[tokio::test]
async fn malformed_stored_document_is_a_server_error_on_detail_only() {
    let backend = MemoryBackend::new().with_document(
        "agents",
        "ag-9",
        serde_json::json!({"id": "ag-9", "type": "person", "external_identifiers": []}),
    );
    let addr = serve(backend).await;

    let (status, body) = get(addr, "/agents/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["id"], "ag-9");
    assert!(body["results"][0]["error"].is_string());

    let (status, _) = get(addr, "/agents/ag-9/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn root_links_every_resource() {
    let addr = serve_fixtures().await;
    let (status, body) = get(addr, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["agents"], "http://archive.test/agents/");
    assert_eq!(body["collections"], "http://archive.test/collections/");
    assert_eq!(body["objects"], "http://archive.test/objects/");
    assert_eq!(body["terms"], "http://archive.test/terms/");
}

#[tokio::test]
async fn schema_describes_resources() {
    let addr = serve_fixtures().await;
    let (status, body) = get(addr, "/schema/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Argo");
    let names: Vec<&str> = body["resources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["agents", "collections", "objects", "terms"]);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let addr = serve_fixtures().await;
    let resp = reqwest::get(format!("http://{addr}/records/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
