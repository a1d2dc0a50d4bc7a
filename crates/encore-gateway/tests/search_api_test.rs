//! Tests for the search endpoint: auth gating, validation errors, and
//! aggregated results over the seeded catalog.


use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use encore_gateway::create_router;
use test_helpers::{body_json, make_auth_test_state, make_open_test_state, post_json};

// ── Auth ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_without_token_returns_401() {
    let app = create_router(make_auth_test_state("secret-token"));

    let req = post_json("/api/v1/search", None, json!({ "query": "rock" }));
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["code"], "unauthenticated");
}

#[tokio::test]
async fn test_search_with_wrong_token_returns_401() {
    let app = create_router(make_auth_test_state("secret-token"));

    let req = post_json("/api/v1/search", Some("wrong"), json!({ "query": "rock" }));
    let status = app.oneshot(req).await.unwrap().status();
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_bypasses_auth() {
    let app = create_router(make_auth_test_state("secret-token"));

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

// ── Validation ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_with_no_query_and_no_filters_returns_400() {
    let app = create_router(make_open_test_state());

    let req = post_json("/api/v1/search", None, json!({}));
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["code"], "invalid-argument");
}

// ── Results ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_returns_newest_first_within_limit() {
    let app = create_router(make_auth_test_state("secret-token"));

    let req = post_json(
        "/api/v1/search",
        Some("secret-token"),
        json!({ "query": "rock", "limit": 2 }),
    );
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let videos = body["videos"].as_array().unwrap();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0]["id"], "v1");
    assert_eq!(videos[1]["id"], "v2");
}

#[tokio::test]
async fn test_filter_only_search_matches_genre() {
    let app = create_router(make_open_test_state());

    let req = post_json(
        "/api/v1/search",
        None,
        json!({ "filters": { "genre": "rock" } }),
    );
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let videos = body["videos"].as_array().unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0]["id"], "v1");
}
