pub mod expenses;
pub mod payments;
#[cfg(feature = "reports")]
pub mod reports;
pub mod roster;
pub mod session;

use axum::{extract::rejection::QueryRejection, extract::Query, http::StatusCode, Json, Router};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::backend::{parse_filter_date, BackendError, PeriodFilter};
use crate::error::ServiceError;

pub fn routes() -> Router<Arc<crate::AppState>> {
    let router = Router::new()
        .merge(session::routes())
        .merge(roster::routes())
        .merge(payments::routes())
        .merge(expenses::routes());

    #[cfg(feature = "reports")]
    let router = router.merge(reports::routes());

    router
}

// --- Ответы об ошибках ---

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub success: bool,
    pub message: String,
}

pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

pub fn to_api_error(status: StatusCode, message: &str) -> (StatusCode, Json<ApiError>) {
    (status, Json(ApiError { success: false, message: message.to_string() }))
}

/// Параметры запроса; ошибка разбора отдаётся в общем формате ответа.
pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| to_api_error(StatusCode::BAD_REQUEST, &rejection.body_text()))
}

impl From<ServiceError> for (StatusCode, Json<ApiError>) {
    fn from(error: ServiceError) -> Self {
        match &error {
            ServiceError::Validation(message) => to_api_error(StatusCode::BAD_REQUEST, message),
            ServiceError::Unauthorized => to_api_error(StatusCode::UNAUTHORIZED, "Access denied"),
            ServiceError::Backend(BackendError::Status { status, .. }) => {
                tracing::error!("backend rejected request: {}", error);
                to_api_error(
                    StatusCode::BAD_GATEWAY,
                    &format!("Backend rejected the request (status {status})"),
                )
            }
            ServiceError::Backend(BackendError::Http(_)) => {
                tracing::error!("backend unreachable: {}", error);
                to_api_error(StatusCode::BAD_GATEWAY, "Backend is unavailable. Try again later.")
            }
            ServiceError::Session(_) | ServiceError::SessionLifetime(_) => {
                tracing::error!("session error: {}", error);
                to_api_error(StatusCode::INTERNAL_SERVER_ERROR, "Could not open a session")
            }
        }
    }
}

// --- Параметры периода ---

/// `?date=` | `?month=&year=` | `?year=`, как в фильтрах журнала.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub date: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl PeriodQuery {
    pub fn to_period(&self) -> Result<PeriodFilter, ServiceError> {
        if let Some(raw) = self.date.as_deref().filter(|d| !d.trim().is_empty()) {
            return parse_filter_date(raw)
                .map(PeriodFilter::Day)
                .ok_or_else(|| ServiceError::Validation(format!("date {raw:?} is not a valid date")));
        }
        match (self.month, self.year) {
            (Some(month), Some(year)) => month_period(month, year),
            (Some(_), None) => Err(ServiceError::Validation("Please enter both month and year".to_string())),
            (None, Some(year)) => Ok(PeriodFilter::Year(year)),
            (None, None) => Ok(PeriodFilter::All),
        }
    }
}

pub(crate) fn month_period(month: u32, year: i32) -> Result<PeriodFilter, ServiceError> {
    if !(1..=12).contains(&month) {
        return Err(ServiceError::Validation(format!("month {month} is out of range 1-12")));
    }
    Ok(PeriodFilter::Month { month, year })
}

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub(crate) fn current_month_period() -> PeriodFilter {
    let today = today();
    PeriodFilter::Month { month: today.month(), year: today.year() }
}
