// tests/api_routes.rs

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use pipedag::api::{PARSE_PATH, SubmissionStore, router};
use pipedag::config::ConfigFile;
use pipedag::types::IdPolicy;
use pipedag_test_utils::builders::{ConfigFileBuilder, PipelineBuilder};
use pipedag_test_utils::init_tracing;

fn app() -> (Router, Arc<SubmissionStore>) {
    app_with(&ConfigFile::defaults())
}

fn app_with(cfg: &ConfigFile) -> (Router, Arc<SubmissionStore>) {
    init_tracing();
    let store = Arc::new(SubmissionStore::new());
    (router(cfg, Arc::clone(&store)), store)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    // Rejections produced by axum itself (e.g. body too large) are plain text.
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_root_ping() {
    let (app, _) = app();
    let (status, body) = send(&app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Ping": "Pong" }));
}

#[tokio::test]
async fn test_info_starts_with_empty_submission() {
    let (app, _) = app();
    let (status, body) = send(&app, get(PARSE_PATH)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["detail"].as_str().unwrap().contains("POST"));
    assert_eq!(body["last_submission"], json!({ "nodes": [], "edges": [] }));
}

#[tokio::test]
async fn test_post_returns_counts() {
    let (app, _) = app();
    let payload = PipelineBuilder::new()
        .nodes(&["a", "b", "c"])
        .chain(&["a", "b", "c"])
        .build();

    let (status, body) = send(&app, post_json(PARSE_PATH, &payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "num_nodes": 3, "num_edges": 2, "is_dag": true }));
}

#[tokio::test]
async fn test_post_cycle() {
    let (app, _) = app();
    let payload = PipelineBuilder::new()
        .nodes(&["a", "b", "c"])
        .chain(&["a", "b", "c", "a"])
        .build();

    let (_, body) = send(&app, post_json(PARSE_PATH, &payload)).await;

    assert_eq!(body, json!({ "num_nodes": 3, "num_edges": 3, "is_dag": false }));
}

#[tokio::test]
async fn test_post_then_info_echoes_submission() {
    let (app, store) = app();
    let payload = json!({
        "nodes": [{ "id": "a", "type": "input" }, "junk"],
        "edges": [{ "source": "a", "target": "missing" }],
    });

    let (status, _) = send(&app, post_json(PARSE_PATH, &payload)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, info) = send(&app, get(PARSE_PATH)).await;
    assert_eq!(info["last_submission"]["nodes"], payload["nodes"]);
    assert_eq!(info["last_submission"]["edges"], payload["edges"]);
    assert_eq!(store.snapshot().nodes, payload["nodes"]);
}

#[tokio::test]
async fn test_non_object_payload_is_empty_graph() {
    let (app, store) = app();

    let (status, body) = send(&app, post_json(PARSE_PATH, &json!([1, 2, 3]))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "num_nodes": 0, "num_edges": 0, "is_dag": true }));
    assert_eq!(store.snapshot().nodes, json!([]));
    assert_eq!(store.snapshot().edges, json!([]));
}

#[tokio::test]
async fn test_invalid_json_is_bad_request() {
    let (app, store) = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri(PARSE_PATH)
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("not valid JSON"));
    // Nothing recorded on failure.
    assert_eq!(store.snapshot().nodes, json!([]));
}

#[tokio::test]
async fn test_missing_content_type_is_accepted() {
    let (app, _) = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri(PARSE_PATH)
        .body(Body::from(r#"{"nodes":[{"id":"a"}],"edges":[]}"#))
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["num_nodes"], json!(1));
}

#[tokio::test]
async fn test_body_limit() {
    let cfg = ConfigFileBuilder::new().max_body_bytes(16).build();
    let (app, _) = app_with(&cfg);
    let payload = PipelineBuilder::new()
        .nodes(&["alpha", "beta", "gamma"])
        .build();

    let (status, _) = send(&app, post_json(PARSE_PATH, &payload)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_diagnostics_enabled() {
    let cfg = ConfigFileBuilder::new().include_diagnostics(true).build();
    let (app, _) = app_with(&cfg);
    let payload = PipelineBuilder::new()
        .nodes(&["a"])
        .raw_node(json!(1))
        .edge("a", "a")
        .build();

    let (_, body) = send(&app, post_json(PARSE_PATH, &payload)).await;

    assert_eq!(body["is_dag"], json!(false));
    assert_eq!(body["diagnostics"]["skipped_nodes"], json!(1));
    assert_eq!(body["diagnostics"]["self_loops"], json!(1));
    assert_eq!(body["diagnostics"]["cycle_witness"], json!("a"));
}

#[tokio::test]
async fn test_truthy_policy_from_config() {
    let cfg = ConfigFileBuilder::new().id_policy(IdPolicy::Truthy).build();
    let (app, _) = app_with(&cfg);
    let payload = PipelineBuilder::new().node(0).node(1).edge(0, 1).build();

    let (_, body) = send(&app, post_json(PARSE_PATH, &payload)).await;

    assert_eq!(body, json!({ "num_nodes": 1, "num_edges": 0, "is_dag": true }));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (app, _) = app();
    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_cors_explicit_origin_list() {
    let cfg = ConfigFileBuilder::new()
        .cors_origins(&["http://localhost:3000"])
        .build();
    let (app, _) = app_with(&cfg);
    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri(PARSE_PATH)
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(preflight).await.unwrap();
    let headers = response.headers();

    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_stores_are_independent() {
    let (first, first_store) = app();
    let (_second, second_store) = app();
    let payload = PipelineBuilder::new().nodes(&["only"]).build();

    send(&first, post_json(PARSE_PATH, &payload)).await;

    assert_eq!(first_store.snapshot().nodes, json!([{ "id": "only" }]));
    assert_eq!(second_store.snapshot().nodes, json!([]));
}
