//! Health check handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub models_loaded: usize,
    pub available: Vec<String>,
    pub skipped: Vec<String>,
}

/// Readiness check endpoint (readiness probe).
///
/// Ready as soon as at least one crop model loaded; a process with an
/// empty registry serves only rejections, so it reports unavailable.
pub async fn ready(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let available: Vec<String> = state
        .registry
        .available()
        .iter()
        .map(|p| p.crop_key.clone())
        .collect();
    let skipped: Vec<String> = state
        .registry
        .skipped()
        .iter()
        .map(|s| s.crop_key.clone())
        .collect();

    let response = ReadinessResponse {
        status: if available.is_empty() {
            "degraded"
        } else {
            "ready"
        }
        .to_string(),
        models_loaded: available.len(),
        available,
        skipped,
    };

    if response.models_loaded > 0 {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
