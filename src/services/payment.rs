//! payment.rs
//!
//! Платежи учеников: списки к оплате и должников, запись платежа с
//! получением PDF-счёта и продление срока, когда долг погашен полностью.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use crate::backend::{BackendClient, BackendResult, PaymentSubmission, PeriodFilter};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{PaymentRecord, SeatRecord, WhatsappLink};
use crate::roster::sort_by_seat;

/// Способ оплаты.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    Cash,
    #[serde(rename = "UPI")]
    Upi,
    Card,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "Card",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    #[serde(deserialize_with = "crate::models::de::label")]
    #[validate(length(min = 1, message = "is required"))]
    pub seat_no: String,
    #[serde(default)]
    pub name: String,
    #[validate(range(exclusive_min = 0.0, message = "must be a positive amount"))]
    pub amount: f64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub remarks: String,
}

/// Итог записи платежа.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub invoice_pdf: Vec<u8>,
    /// Долг по месту после платежа равен нулю.
    pub settled: bool,
    /// Новый срок, если он был продлён.
    pub next_expiry: Option<String>,
}

const EXPIRY_INPUT_FORMATS: [&str; 3] = ["%d %b %Y", "%d %B %Y", "%Y-%m-%d"];
const EXPIRY_OUTPUT_FORMAT: &str = "%d %b %Y";

/// Разбирает дату окончания в одном из форматов бэкенда.
pub fn parse_expiry(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    EXPIRY_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Сдвигает срок на календарный месяц; 31 января -> 28/29 февраля.
pub fn roll_expiry_forward(raw: &str) -> Option<String> {
    let next = parse_expiry(raw)?.checked_add_months(Months::new(1))?;
    Some(next.format(EXPIRY_OUTPUT_FORMAT).to_string())
}

fn is_vacant_status(record: &SeatRecord) -> bool {
    record.status_lower() == "vacant"
}

#[derive(Clone)]
pub struct PaymentService {
    backend: BackendClient,
}

impl PaymentService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// Все занятые места (статус не "vacant"), по порядку мест.
    pub async fn payable_students(&self) -> ServiceResult<Vec<SeatRecord>> {
        let mut students: Vec<SeatRecord> = self
            .backend
            .students()
            .await?
            .into_iter()
            .filter(|s| !is_vacant_status(s))
            .collect();
        sort_by_seat(&mut students);
        Ok(students)
    }

    /// Места с положительным долгом.
    pub async fn outstanding_dues(&self) -> ServiceResult<Vec<SeatRecord>> {
        let mut dues: Vec<SeatRecord> = self
            .backend
            .students_with_dues()
            .await?
            .into_iter()
            .filter(|s| s.due_or_zero() > 0.0 && !is_vacant_status(s))
            .collect();
        sort_by_seat(&mut dues);
        Ok(dues)
    }

    pub async fn history(&self, period: &PeriodFilter) -> ServiceResult<Vec<PaymentRecord>> {
        Ok(self.backend.payments(period).await?)
    }

    pub async fn whatsapp_link(&self, invoice_url: &str) -> ServiceResult<WhatsappLink> {
        if invoice_url.trim().is_empty() {
            return Err(ServiceError::Validation("invoice_url is required".to_string()));
        }
        Ok(self.backend.whatsapp_invoice_link(invoice_url).await?)
    }

    /// Записывает платёж. Если после него долг по месту нулевой, срок
    /// продлевается на месяц и статус ставится в "Done".
    ///
    /// Когда бэкенд уже принял платёж, счёт возвращается всегда: сбой
    /// последующих шагов только логируется, место остаётся неотмеченным.
    pub async fn record_payment(&self, request: RecordPaymentRequest) -> ServiceResult<PaymentReceipt> {
        request.validate()?;

        let submission = PaymentSubmission {
            seat_no: request.seat_no.clone(),
            name: request.name.clone(),
            amount: request.amount,
            payment_method: request.payment_method.as_str().to_string(),
            remarks: request.remarks.clone(),
        };
        let invoice_pdf = self.backend.record_payment(&submission).await?;
        info!(
            "payment recorded: seat={} amount={} method={}",
            submission.seat_no, submission.amount, submission.payment_method
        );

        let receipt = match self.settle(&request.seat_no).await {
            Ok(Settlement::Settled { next_expiry }) => PaymentReceipt { invoice_pdf, settled: true, next_expiry },
            Ok(Settlement::Outstanding) => PaymentReceipt { invoice_pdf, settled: false, next_expiry: None },
            Err(e) => {
                warn!("payment for seat {} recorded, but settling the seat failed: {}", request.seat_no, e);
                PaymentReceipt { invoice_pdf, settled: false, next_expiry: None }
            }
        };
        Ok(receipt)
    }

    async fn settle(&self, seat_no: &str) -> BackendResult<Settlement> {
        let students = self.backend.students().await?;
        let Some(updated) = students.into_iter().find(|s| s.seat_no == seat_no) else {
            warn!("seat {} not in roster after payment", seat_no);
            return Ok(Settlement::Outstanding);
        };

        if updated.due_or_zero() != 0.0 {
            return Ok(Settlement::Outstanding);
        }

        let name = updated.name.as_deref().unwrap_or_default();
        let next_expiry = updated.expiry_date.as_deref().and_then(roll_expiry_forward);
        match &next_expiry {
            Some(expiry) => self.backend.update_expiry(&updated.seat_no, name, expiry).await?,
            None => warn!(
                "seat {}: expiry {:?} not extended (unparseable or missing)",
                updated.seat_no, updated.expiry_date
            ),
        }
        self.backend.update_status(&updated.seat_no, "Done").await?;
        info!("seat {} settled, next expiry {:?}", updated.seat_no, next_expiry);

        Ok(Settlement::Settled { next_expiry })
    }
}

enum Settlement {
    Outstanding,
    Settled { next_expiry: Option<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_rolls_one_month() {
        assert_eq!(roll_expiry_forward("01 May 2025").as_deref(), Some("01 Jun 2025"));
        assert_eq!(roll_expiry_forward("15 December 2025").as_deref(), Some("15 Jan 2026"));
        assert_eq!(roll_expiry_forward("2025-03-10").as_deref(), Some("10 Apr 2025"));
    }

    #[test]
    fn month_end_is_clamped() {
        assert_eq!(roll_expiry_forward("31 Jan 2025").as_deref(), Some("28 Feb 2025"));
        assert_eq!(roll_expiry_forward("31 Jan 2024").as_deref(), Some("29 Feb 2024"));
    }

    #[test]
    fn unparseable_expiry_is_left_alone() {
        assert_eq!(roll_expiry_forward("next month"), None);
        assert_eq!(roll_expiry_forward(""), None);
    }

    #[test]
    fn amount_must_be_positive() {
        let request = RecordPaymentRequest {
            seat_no: "3".to_string(),
            name: "Kiran".to_string(),
            amount: 0.0,
            payment_method: PaymentMethod::Upi,
            remarks: String::new(),
        };
        assert!(request.validate().is_err());
        assert!(RecordPaymentRequest { amount: 500.0, ..request }.validate().is_ok());
    }
}
