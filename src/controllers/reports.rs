//! reports.rs
//!
//! Финансовые отчёты за день, месяц или год.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Datelike;
use serde::Deserialize;
use std::sync::Arc;

use super::{current_month_period, month_period, query_params, today, ApiResult, PeriodQuery};
use crate::backend::{PeriodFilter, ReportFormat};
use crate::error::ServiceError;
use crate::middleware::SessionUser;
use crate::services::reports::ReportSummary;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports/summary", get(get_summary))
        .route("/reports/download/{format}", get(download_report))
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ReportPeriod {
    Day,
    Month,
    Year,
}

#[derive(Debug, Default, Deserialize)]
struct ReportQuery {
    period: Option<ReportPeriod>,
    date: Option<String>,
    month: Option<u32>,
    year: Option<i32>,
    #[serde(default)]
    search: String,
}

impl ReportQuery {
    /// Месяц и год по умолчанию - текущие; день без даты - весь журнал.
    fn to_period(&self) -> Result<PeriodFilter, ServiceError> {
        let now = today();
        match self.period {
            Some(ReportPeriod::Month) => month_period(
                self.month.unwrap_or_else(|| now.month()),
                self.year.unwrap_or_else(|| now.year()),
            ),
            Some(ReportPeriod::Year) => Ok(PeriodFilter::Year(self.year.unwrap_or_else(|| now.year()))),
            Some(ReportPeriod::Day) => PeriodQuery { date: self.date.clone(), month: None, year: None }.to_period(),
            None if self.date.is_none() && self.month.is_none() && self.year.is_none() => {
                Ok(current_month_period())
            }
            None => PeriodQuery { date: self.date.clone(), month: self.month, year: self.year }.to_period(),
        }
    }
}

// GET /api/reports/summary?period=day|month|year&date=&month=&year=&search=
async fn get_summary(
    State(state): State<Arc<AppState>>,
    _user: SessionUser,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Json<ReportSummary>> {
    let query = query_params(query)?;
    let period = query.to_period()?;
    let summary = state.reports.summary(&period, query.search.trim(), today()).await?;
    Ok(Json(summary))
}

// GET /api/reports/download/{csv|pdf}
async fn download_report(
    State(state): State<Arc<AppState>>,
    _user: SessionUser,
    Path(format): Path<ReportFormat>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let period = query_params(query)?.to_period()?;
    let report = state.reports.download(format, &period).await?;

    let disposition = format!("attachment; filename=\"{}\"", report.filename);
    let disposition = HeaderValue::from_str(&disposition)
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(report.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.bytes,
    )
        .into_response())
}
