use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::info;

use crate::core::questions::QUESTIONS;
use crate::core::scan::{NewScanResult, ScanResult};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub const X_CACHE: &str = "x-cache";
const QUESTIONS_CACHE_CONTROL: &str = "public, max-age=3600";

pub async fn leaderboard_handler(
    State(state): State<Arc<AppState>>,
) -> AppResult<impl IntoResponse> {
    let read = state.leaderboard.read().await?;
    let outcome: &'static str = read.outcome.into();

    Ok((
        [
            (HeaderName::from_static(X_CACHE), outcome.to_string()),
            (
                header::CACHE_CONTROL,
                state.leaderboard.policy().cache_control(),
            ),
        ],
        Json(read.payload),
    ))
}

pub async fn submit_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewScanResult>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ScanResult>)> {
    let Json(new_scan) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let scan = new_scan.into_scan_result()?;

    state.store.insert(&scan).await?;
    info!(name = %scan.name, score = scan.score, verdict = %scan.verdict, "Scan result saved.");

    state.leaderboard.invalidate().await;

    Ok((StatusCode::CREATED, Json(scan)))
}

pub async fn questions_handler() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, QUESTIONS_CACHE_CONTROL)],
        Json(&*QUESTIONS),
    )
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cache = match state.health.is_available() {
        true => "available",
        false => "unavailable",
    };
    Json(json!({ "status": "ok", "cache": cache }))
}
