//! Log intake and query handlers

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::recorder::Recorder;
use crate::AppState;

/// Upper bound on lines returned by the recent query.
const MAX_RECENT_LINES: usize = 1000;

/// Record one log line. The body is treated as plain text and the
/// response is `OK` even when the write fails; failures are only visible
/// in server logs. Senders fire and forget.
pub async fn append(State(state): State<AppState>, body: Bytes) -> &'static str {
    let message = String::from_utf8_lossy(&body);

    let mut recorder = state.recorder.lock().await;
    if let Err(e) = recorder.append(&message) {
        tracing::error!("Failed to record log line: {}", e);
    }

    "OK"
}

#[derive(Deserialize)]
pub struct RecentParams {
    pub lines: Option<usize>,
}

#[derive(Serialize)]
pub struct RecentResponse {
    pub lines: Vec<String>,
    pub count: usize,
}

/// Return the newest lines of the log, oldest first.
pub async fn recent(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> AppResult<Json<RecentResponse>> {
    let requested = params.lines.unwrap_or(50);
    if requested == 0 {
        return Err(AppError::BadRequest("lines must be at least 1".to_string()));
    }
    let requested = requested.min(MAX_RECENT_LINES);

    let recorder = state.recorder.lock().await;
    let lines = Recorder::tail(recorder.path(), requested)?;

    let count = lines.len();
    Ok(Json(RecentResponse { lines, count }))
}
