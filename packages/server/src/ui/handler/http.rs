//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::SessionId,
    infrastructure::dto::http::{SessionDetailDto, SessionSummaryDto},
    ui::state::AppState,
    usecase::GetSessionDetailError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of sessions
pub async fn get_sessions(State(state): State<Arc<AppState>>) -> Json<Vec<SessionSummaryDto>> {
    let sessions = state.get_sessions_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(sessions.iter().map(SessionSummaryDto::from).collect())
}

/// Get session detail by ID
pub async fn get_session_detail(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionDetailDto>, StatusCode> {
    let Ok(session_id) = SessionId::try_from(session_id) else {
        return Err(StatusCode::NOT_FOUND);
    };

    match state.get_session_detail_usecase.execute(&session_id).await {
        Ok(session) => Ok(Json(SessionDetailDto::from(&session))),
        Err(GetSessionDetailError::NotFound) => Err(StatusCode::NOT_FOUND),
    }
}
