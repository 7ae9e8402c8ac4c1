use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::state::AppState;

#[derive(Deserialize)]
pub struct AnalyzePayload {
    pub url: Option<String>,
}

/// POST /api/analyze
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzePayload>, JsonRejection>,
) -> Response {
    let url = payload
        .ok()
        .and_then(|Json(p)| p.url)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    let Some(url) = url else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "URL is required" })),
        )
            .into_response();
    };

    let webpage_info = state.extractor.extract(&url).await;
    (
        StatusCode::OK,
        Json(json!({ "status": "success", "data": webpage_info })),
    )
        .into_response()
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "message": "Chat AI Web Analyzer is running"
    }))
}
