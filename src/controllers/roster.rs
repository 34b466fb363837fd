use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{query_params, ApiResult};
use crate::middleware::SessionUser;
use crate::roster::{FilterSelection, RosterEntry};
use crate::services::roster::{ReplaceStudentRequest, RosterSnapshot, SeatUpdate};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/roster", get(get_roster))
        .route("/roster/current", get(get_current_roster))
        .route("/roster/vacate", post(vacate_seat))
        .route("/roster/replace", post(replace_student))
        .route("/roster/status", post(toggle_status))
        .route("/roster/expiry", post(update_expiry))
}

#[derive(Debug, Deserialize)]
struct SeatRequest {
    #[serde(deserialize_with = "crate::models::de::label")]
    seat_no: String,
}

#[derive(Debug, Deserialize)]
struct ToggleStatusRequest {
    #[serde(deserialize_with = "crate::models::de::label")]
    seat_no: String,
    #[serde(default)]
    current_status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateExpiryRequest {
    #[serde(deserialize_with = "crate::models::de::label")]
    seat_no: String,
    #[serde(default)]
    name: String,
    new_expiry: String,
}

// GET /api/roster?status=all|expired|vacant&day=all|full|morning|evening
async fn get_roster(
    State(state): State<Arc<AppState>>,
    _user: SessionUser,
    query: Result<Query<FilterSelection>, QueryRejection>,
) -> ApiResult<Json<Vec<RosterEntry>>> {
    let selection = query_params(query)?;
    Ok(Json(state.roster.refresh(selection).await?))
}

// GET /api/roster/current
async fn get_current_roster(
    State(state): State<Arc<AppState>>,
    _user: SessionUser,
) -> Json<RosterSnapshot> {
    Json(state.roster.current().await)
}

// POST /api/roster/vacate
async fn vacate_seat(
    State(state): State<Arc<AppState>>,
    _user: SessionUser,
    Json(req): Json<SeatRequest>,
) -> ApiResult<Json<SeatUpdate>> {
    Ok(Json(state.roster.vacate_seat(&req.seat_no).await?))
}

// POST /api/roster/replace
async fn replace_student(
    State(state): State<Arc<AppState>>,
    _user: SessionUser,
    Json(req): Json<ReplaceStudentRequest>,
) -> ApiResult<Json<SeatUpdate>> {
    Ok(Json(state.roster.replace_student(req).await?))
}

// POST /api/roster/status
async fn toggle_status(
    State(state): State<Arc<AppState>>,
    _user: SessionUser,
    Json(req): Json<ToggleStatusRequest>,
) -> ApiResult<Json<SeatUpdate>> {
    let current = req.current_status.as_deref().unwrap_or_default();
    Ok(Json(state.roster.toggle_status(&req.seat_no, current).await?))
}

// POST /api/roster/expiry
async fn update_expiry(
    State(state): State<Arc<AppState>>,
    _user: SessionUser,
    Json(req): Json<UpdateExpiryRequest>,
) -> ApiResult<Json<SeatUpdate>> {
    Ok(Json(state.roster.update_expiry(&req.seat_no, &req.name, &req.new_expiry).await?))
}
