//! Health check handler

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    log_file: String,
    lines_written: u64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let recorder = state.recorder.lock().await;

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        log_file: recorder.path().display().to_string(),
        lines_written: recorder.lines_written(),
    })
}

// ============================================================================
// TESTS
// ============================================================================
