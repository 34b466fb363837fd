//! client.rs
//!
//! Клиент REST API внешнего бэкенда. Бэкенд владеет всеми данными
//! (ученики, платежи, расходы, счета), здесь только типизированные вызовы.

use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::error::{BackendError, BackendResult};
use super::period::{PeriodFilter, PeriodParams};
use crate::config::BackendConfig;
use crate::models::{DashboardTotals, Expense, NetProfit, PaymentRecord, SeatRecord, WhatsappLink};

/// Тело запроса `/replace-student`. Освобождение места - тот же запрос с именем "Vacant".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAssignment {
    pub seat_no: String,
    pub name: String,
    pub day_type: String,
    pub charge: i64,
    pub start_date: String,
    pub phone: String,
    pub status: String,
}

impl StudentAssignment {
    pub fn vacant(seat_no: impl Into<String>) -> Self {
        Self {
            seat_no: seat_no.into(),
            name: "Vacant".to_string(),
            day_type: String::new(),
            charge: 0,
            start_date: String::new(),
            phone: String::new(),
            status: String::new(),
        }
    }
}

/// Тело запроса `/record-payment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSubmission {
    pub seat_no: String,
    pub name: String,
    pub amount: f64,
    pub payment_method: String,
    pub remarks: String,
}

/// Тело запроса `POST /expenses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub category: String,
    pub amount: f64,
    pub description: String,
    pub date: String,
}

#[derive(Debug, Serialize)]
struct ExpiryUpdate<'a> {
    seat_no: &'a str,
    name: &'a str,
    new_expiry: &'a str,
}

#[derive(Debug, Serialize)]
struct StatusUpdate<'a> {
    seat_no: &'a str,
    new_status: &'a str,
}

#[derive(Debug, Serialize)]
struct InvoiceLinkRequest<'a> {
    invoice_url: &'a str,
}

/// Формат финансового отчёта.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Csv,
    Pdf,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ReportFormat::Csv => "text/csv",
            ReportFormat::Pdf => "application/pdf",
        }
    }
}

/// Клиент бэкенда. Дешёво клонируется: `reqwest::Client` внутри на `Arc`.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn from_config(config: &BackendConfig) -> BackendResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Отправляет запрос и возвращает ответ только при статусе 2xx.
    async fn send(&self, request: RequestBuilder, what: &str) -> BackendResult<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            warn!("backend {} failed: {}", what, e);
            BackendError::Http(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("backend {} returned {}: {}", what, status, body);
            return Err(BackendError::Status { status: status.as_u16(), body });
        }
        Ok(response)
    }

    async fn get_json<T, Q>(&self, path: &str, query: &Q) -> BackendResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        debug!("GET {}", path);
        let request = self.http.get(self.url(path)).query(query);
        Ok(self.send(request, path).await?.json::<T>().await?)
    }

    async fn get_bytes<Q: Serialize + ?Sized>(&self, path: &str, query: &Q) -> BackendResult<Vec<u8>> {
        debug!("GET {} (binary)", path);
        let request = self.http.get(self.url(path)).query(query);
        Ok(self.send(request, path).await?.bytes().await?.to_vec())
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> BackendResult<reqwest::Response> {
        debug!("POST {}", path);
        let request = self.http.post(self.url(path)).json(body);
        self.send(request, path).await
    }

    // === Ученики и места ===

    pub async fn students(&self) -> BackendResult<Vec<SeatRecord>> {
        self.get_json("/students", &PeriodParams::default()).await
    }

    pub async fn expired_students(&self) -> BackendResult<Vec<SeatRecord>> {
        self.get_json("/expired-students", &PeriodParams::default()).await
    }

    pub async fn students_with_dues(&self) -> BackendResult<Vec<SeatRecord>> {
        self.get_json("/students-with-dues", &PeriodParams::default()).await
    }

    pub async fn replace_student(&self, assignment: &StudentAssignment) -> BackendResult<()> {
        self.post("/replace-student", assignment).await.map(drop)
    }

    pub async fn update_expiry(&self, seat_no: &str, name: &str, new_expiry: &str) -> BackendResult<()> {
        let body = ExpiryUpdate { seat_no, name, new_expiry };
        self.post("/update-expiry", &body).await.map(drop)
    }

    pub async fn update_status(&self, seat_no: &str, new_status: &str) -> BackendResult<()> {
        let body = StatusUpdate { seat_no, new_status };
        self.post("/update-status", &body).await.map(drop)
    }

    // === Платежи ===

    /// Записывает платёж; бэкенд отвечает PDF-счётом.
    pub async fn record_payment(&self, payment: &PaymentSubmission) -> BackendResult<Vec<u8>> {
        let response = self.post("/record-payment", payment).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn whatsapp_invoice_link(&self, invoice_url: &str) -> BackendResult<WhatsappLink> {
        let response = self
            .post("/generate-whatsapp-invoice-link", &InvoiceLinkRequest { invoice_url })
            .await?;
        Ok(response.json::<WhatsappLink>().await?)
    }

    pub async fn payments(&self, period: &PeriodFilter) -> BackendResult<Vec<PaymentRecord>> {
        self.ledger("payments", period).await
    }

    // === Расходы ===

    pub async fn expenses(&self, period: &PeriodFilter) -> BackendResult<Vec<Expense>> {
        self.ledger("expenses", period).await
    }

    pub async fn add_expense(&self, expense: &NewExpense) -> BackendResult<()> {
        self.post("/expenses", expense).await.map(drop)
    }

    /// Платежи и расходы фильтруются одинаково: день и год - отдельные
    /// эндпоинты, месяц - параметры основного списка.
    async fn ledger<T: DeserializeOwned>(&self, root: &str, period: &PeriodFilter) -> BackendResult<Vec<T>> {
        let path = match period {
            PeriodFilter::Day(_) => format!("/{root}/by-date"),
            PeriodFilter::Year(_) => format!("/{root}/by-year"),
            PeriodFilter::All | PeriodFilter::Month { .. } => format!("/{root}"),
        };
        self.get_json(&path, &period.params()).await
    }

    // === Отчёты ===

    pub async fn dashboard_totals(&self, period: &PeriodFilter) -> BackendResult<DashboardTotals> {
        self.get_json("/dashboard-totals", &period.totals_params()).await
    }

    pub async fn net_profit(&self, period: &PeriodFilter) -> BackendResult<NetProfit> {
        self.get_json("/net-profit", &period.params()).await
    }

    pub async fn financial_report(&self, format: ReportFormat, period: &PeriodFilter) -> BackendResult<Vec<u8>> {
        let path = format!("/report/financial-{}", format.extension());
        self.get_bytes(&path, &period.params()).await
    }
}
