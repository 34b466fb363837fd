use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use std::sync::Arc;

use super::ApiResult;
use crate::services::session::SessionToken;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/session", post(open_session))
}

#[derive(Debug, Deserialize)]
struct OpenSessionRequest {
    access_code: String,
}

// POST /api/session
async fn open_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OpenSessionRequest>,
) -> ApiResult<Json<SessionToken>> {
    Ok(Json(state.sessions.open(&req.access_code)?))
}
