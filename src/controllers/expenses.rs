use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use super::{query_params, ApiResult, PeriodQuery};
use crate::middleware::SessionUser;
use crate::models::Expense;
use crate::services::expenses::AddExpenseRequest;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/expenses", get(list_expenses).post(add_expense))
}

// GET /api/expenses?date= | ?month=&year= | ?year=
async fn list_expenses(
    State(state): State<Arc<AppState>>,
    _user: SessionUser,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Expense>>> {
    let period = query_params(query)?.to_period()?;
    Ok(Json(state.expenses.list(&period).await?))
}

// POST /api/expenses
async fn add_expense(
    State(state): State<Arc<AppState>>,
    _user: SessionUser,
    Json(req): Json<AddExpenseRequest>,
) -> ApiResult<impl IntoResponse> {
    state.expenses.add(req).await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "message": "Expense added" }))))
}
