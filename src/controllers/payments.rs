use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{query_params, ApiResult, PeriodQuery};
use crate::middleware::SessionUser;
use crate::models::{PaymentRecord, SeatRecord, WhatsappLink};
use crate::services::payment::RecordPaymentRequest;
use crate::AppState;

pub const SETTLED_HEADER: &str = "x-seat-settled";
pub const NEXT_EXPIRY_HEADER: &str = "x-next-expiry";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/payments", post(record_payment))
        .route("/payments/students", get(get_payable_students))
        .route("/payments/dues", get(get_outstanding_dues))
        .route("/payments/history", get(get_history))
        .route("/payments/whatsapp-link", post(whatsapp_link))
}

#[derive(Debug, Deserialize)]
struct WhatsappLinkRequest {
    invoice_url: String,
}

// GET /api/payments/students
async fn get_payable_students(
    State(state): State<Arc<AppState>>,
    _user: SessionUser,
) -> ApiResult<Json<Vec<SeatRecord>>> {
    Ok(Json(state.payments.payable_students().await?))
}

// GET /api/payments/dues
async fn get_outstanding_dues(
    State(state): State<Arc<AppState>>,
    _user: SessionUser,
) -> ApiResult<Json<Vec<SeatRecord>>> {
    Ok(Json(state.payments.outstanding_dues().await?))
}

// GET /api/payments/history?date= | ?month=&year= | ?year=
async fn get_history(
    State(state): State<Arc<AppState>>,
    _user: SessionUser,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PaymentRecord>>> {
    let period = query_params(query)?.to_period()?;
    Ok(Json(state.payments.history(&period).await?))
}

// POST /api/payments
//
// Тело ответа - PDF-счёт от бэкенда.
async fn record_payment(
    State(state): State<Arc<AppState>>,
    _user: SessionUser,
    Json(req): Json<RecordPaymentRequest>,
) -> ApiResult<Response> {
    let receipt = state.payments.record_payment(req).await?;

    let mut response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_static("attachment; filename=\"invoice.pdf\""),
            ),
        ],
        receipt.invoice_pdf,
    )
        .into_response();

    let headers = response.headers_mut();
    headers.insert(
        SETTLED_HEADER,
        HeaderValue::from_static(if receipt.settled { "true" } else { "false" }),
    );
    if let Some(value) = receipt.next_expiry.and_then(|e| HeaderValue::from_str(&e).ok()) {
        headers.insert(NEXT_EXPIRY_HEADER, value);
    }

    Ok(response)
}

// POST /api/payments/whatsapp-link
async fn whatsapp_link(
    State(state): State<Arc<AppState>>,
    _user: SessionUser,
    Json(req): Json<WhatsappLinkRequest>,
) -> ApiResult<Json<WhatsappLink>> {
    Ok(Json(state.payments.whatsapp_link(&req.invoice_url).await?))
}
