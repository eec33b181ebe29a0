//! Router-level tests for the HTTP API
//!
//! The router is driven with `oneshot`; the search backend is a canned stub
//! or a real Solr client pointed at a closed port.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use server::error::ErrorResponse;
use server::{build_router, ServerConfig, ServerState};
use whiiif::{
    BackendError, FsManifestStore, SearchBackend, SearchConfig, SearchService, SelectQuery,
};

const WITHIN: &str = include_str!("../../../tests/data/within_response.json");

struct CannedBackend(Value);

#[async_trait::async_trait]
impl SearchBackend for CannedBackend {
    async fn select(&self, _query: &SelectQuery) -> Result<Value, BackendError> {
        Ok(self.0.clone())
    }
}

fn app_with(backend: Arc<dyn SearchBackend>, dir: &TempDir) -> Router {
    let config = ServerConfig {
        public_url: "https://search.example.org".into(),
        ..Default::default()
    };
    let search = SearchService::new(
        SearchConfig::default(),
        backend,
        Arc::new(FsManifestStore::new(dir.path())),
    );
    build_router(Arc::new(ServerState::with_search(config, search)))
}

fn canned_app(dir: &TempDir) -> Router {
    let payload: Value = serde_json::from_str(WITHIN).unwrap();
    app_with(Arc::new(CannedBackend(payload)), dir)
}

fn unreachable_app(dir: &TempDir) -> Router {
    let config = ServerConfig::default();
    let search = SearchService::from_config(SearchConfig {
        solr_url: "http://127.0.0.1:9/solr".into(),
        manifest_location: dir.path().to_path_buf(),
        ..Default::default()
    });
    build_router(Arc::new(ServerState::with_search(config, search)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
    let request = Request::builder()
        .uri(uri)
        .header(header::ORIGIN, "https://viewer.example.org")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap();

    (status, headers, body)
}

#[tokio::test]
async fn test_within_search_returns_annotation_list() {
    let dir = TempDir::new().unwrap();
    let uri = "/search/test-manifest?q=test%20response&date=2020&motivation=painting&date=2021";
    let (status, headers, body) = get(canned_app(&dir), uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(headers.contains_key("x-request-id"));

    assert_eq!(body["@type"], "sc:AnnotationList");
    assert_eq!(body["@id"], format!("https://search.example.org{uri}"));
    assert_eq!(body["within"]["@type"], "sc:Layer");
    assert_eq!(body["within"]["total"], 3);
    assert_eq!(
        body["within"]["ignored"],
        serde_json::json!(["date", "motivation"])
    );
    assert_eq!(body["hits"].as_array().unwrap().len(), 3);
    assert_eq!(body["resources"].as_array().unwrap().len(), 4);
    assert_eq!(body["resources"][0]["@type"], "oa:Annotation");
}

#[tokio::test]
async fn test_backend_down_still_answers_200() {
    let dir = TempDir::new().unwrap();

    let (status, headers, body) = get(unreachable_app(&dir), "/search/book-1?q=fox").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(body["within"]["total"], 0);
    assert_eq!(body["hits"], serde_json::json!([]));
    assert_eq!(body["resources"], serde_json::json!([]));

    let (status, _, body) = get(unreachable_app(&dir), "/collection_search?q=fox").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));

    let (status, _, body) =
        get(unreachable_app(&dir), "/snippet_search/book-1?q=fox&snips=abc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_missing_q_is_bad_request() {
    let dir = TempDir::new().unwrap();

    for uri in [
        "/search/book-1",
        "/collection_search?motivation=painting",
        "/snippet_search/book-1?snips=2",
    ] {
        let (status, _, body) = get(canned_app(&dir), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");

        let error: ErrorResponse = serde_json::from_value(body).unwrap();
        assert_eq!(error.error.code, "BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let dir = TempDir::new().unwrap();
    let (status, headers, body) = get(canned_app(&dir), "/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_health_and_info() {
    let dir = TempDir::new().unwrap();

    let (status, _, body) = get(canned_app(&dir), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, _, body) = get(canned_app(&dir), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "whiiif");

    let (status, _, body) = get(canned_app(&dir), "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["server"]["solr_core"], "whiiif");
}

#[tokio::test]
async fn test_incoming_request_id_is_echoed() {
    let dir = TempDir::new().unwrap();
    let request = Request::builder()
        .uri("/snippet_search/book-1?q=fox")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();

    let response = canned_app(&dir).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-42");
}
