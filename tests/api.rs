mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use common::{FakeCache, FakeStore};
use naughty_nice::cache::{DisabledCache, LocalCache};
use naughty_nice::core::leaderboard::CachePolicy;
use naughty_nice::server::router;
use naughty_nice::state::AppState;
use naughty_nice::storage::MemoryStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

fn local_app() -> Router {
    let cache = Arc::new(LocalCache::new());
    router(AppState::new(
        Arc::new(MemoryStore::new()),
        cache.clone(),
        cache,
        CachePolicy::default(),
    ))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, header::HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn leaderboard_reports_cache_outcome() {
    let app = local_app();

    let (status, headers, body) = send(&app, get("/api/leaderboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["x-cache"], "MISS");
    assert_eq!(
        headers[header::CACHE_CONTROL],
        "public, max-age=60, stale-while-revalidate=300"
    );
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["metadata"]["total"], 0);
    assert_eq!(body["metadata"]["source"], "database");

    let (status, headers, body) = send(&app, get("/api/leaderboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["x-cache"], "HIT");
    assert_eq!(body["metadata"]["source"], "cache");
}

#[tokio::test]
async fn submission_shows_up_on_next_read() {
    let app = local_app();
    // warm the cache so the read below depends on invalidation
    send(&app, get("/api/leaderboard")).await;

    let (status, _, alice) = send(
        &app,
        post_json(
            "/api/scan-results",
            json!({ "name": "Alice", "verdict": "NICE", "score": 80 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(alice["name"], "Alice");
    assert_eq!(alice["verdict"], "NICE");
    assert_eq!(alice["score"], 80);
    assert!(alice["id"].is_string());
    assert!(alice["timestamp"].is_string());
    assert!(alice["message"].as_str().unwrap().contains("Alice"));

    let (status, _, _) = send(
        &app,
        post_json(
            "/api/scan-results",
            json!({ "name": "Grinch", "verdict": "NAUGHTY", "score": 3, "country": "us" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _, _) = send(
        &app,
        post_json(
            "/api/scan-results",
            json!({ "name": "Bob", "verdict": "NICE", "score": 95, "message": "Ho ho ho" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, headers, body) = send(&app, get("/api/leaderboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["x-cache"], "MISS");
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bob", "Alice", "Grinch"]);
    assert_eq!(body["data"][2]["country"], "US");
    assert_eq!(body["metadata"]["total"], 3);
}

#[tokio::test]
async fn invalid_submissions_are_rejected() {
    let app = local_app();

    let (status, _, body) = send(
        &app,
        post_json(
            "/api/scan-results",
            json!({ "name": "Alice", "verdict": "NICE", "score": 180 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("score"));

    let (status, _, _) = send(
        &app,
        post_json(
            "/api/scan-results",
            json!({ "name": "Alice", "verdict": "MAYBE", "score": 50 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, body) = send(&app, get("/api/leaderboard")).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn store_failure_surfaces_as_server_error() {
    let store = Arc::new(FakeStore::default());
    let cache = Arc::new(FakeCache::default());
    store.set_failing(true);
    let app = router(AppState::new(
        store,
        cache.clone(),
        cache,
        CachePolicy::default(),
    ));

    let (status, _, body) = send(&app, get("/api/leaderboard")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());

    let (status, _, _) = send(
        &app,
        post_json(
            "/api/scan-results",
            json!({ "name": "Alice", "verdict": "NICE", "score": 80 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn disabled_cache_always_misses() {
    let app = router(AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(DisabledCache),
        Arc::new(DisabledCache),
        CachePolicy::default(),
    ));

    for _ in 0..3 {
        let (status, headers, _) = send(&app, get("/api/leaderboard")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["x-cache"], "MISS");
    }

    let (status, _, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "cache": "unavailable" }));
}

#[tokio::test]
async fn questions_are_served_with_long_cache_lifetime() {
    let app = local_app();

    let (status, headers, body) = send(&app, get("/api/questions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=3600");
    let questions = body.as_array().unwrap();
    assert!(!questions.is_empty());
    assert!(questions[0]["answers"].as_array().unwrap().len() > 1);
}

#[tokio::test]
async fn health_reports_cache_state() {
    let (status, _, body) = send(&local_app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "cache": "available" }));
}
