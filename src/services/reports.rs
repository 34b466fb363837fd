//! reports.rs
//!
//! Финансовые отчёты: итоги за период, суммы текущего месяца,
//! поиск по таблицам платежей и расходов, выгрузка CSV/PDF.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::{BackendClient, PeriodFilter, ReportFormat};
use crate::error::ServiceResult;
use crate::models::{Expense, PaymentRecord};

/// Точка графика.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: Option<String>,
    pub amount: f64,
}

/// Строка платежа со ссылкой на счёт, пригодной для браузера.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRow {
    #[serde(flatten)]
    pub record: PaymentRecord,
    pub invoice_href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_collected: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub month_payments: f64,
    pub month_expenses: f64,
    pub monthly_income: f64,
    pub payments: Vec<PaymentRow>,
    pub expenses: Vec<Expense>,
    pub payment_series: Vec<ChartPoint>,
    pub expense_series: Vec<ChartPoint>,
}

#[derive(Debug, Clone)]
pub struct ReportDownload {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

/// Дата строки журнала: ISO-дата, ISO дата-время или `DD Mon YYYY`.
pub fn parse_ledger_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok().map(|d| d.date()))
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok().map(|d| d.date()))
        .or_else(|| NaiveDate::parse_from_str(raw, "%d %b %Y").ok())
}

fn in_month(date: Option<&str>, today: NaiveDate) -> bool {
    date.and_then(parse_ledger_date)
        .is_some_and(|d| d.month() == today.month() && d.year() == today.year())
}

/// Сумма платежей, датированных месяцем `today`.
pub fn month_payments_total(rows: &[PaymentRecord], today: NaiveDate) -> f64 {
    rows.iter()
        .filter(|p| in_month(p.date.as_deref(), today))
        .map(|p| p.amount)
        .sum()
}

/// Сумма расходов, датированных месяцем `today`.
pub fn month_expenses_total(rows: &[Expense], today: NaiveDate) -> f64 {
    rows.iter()
        .filter(|e| in_month(e.date.as_deref(), today))
        .map(|e| e.amount)
        .sum()
}

fn contains_ci(haystack: Option<&str>, needle_lower: &str) -> bool {
    haystack.unwrap_or_default().to_lowercase().contains(needle_lower)
}

/// Поиск по имени и способу оплаты без учёта регистра, по метке места - как есть.
pub fn search_payments<'a>(rows: &'a [PaymentRecord], query: &str) -> Vec<&'a PaymentRecord> {
    if query.is_empty() {
        return rows.iter().collect();
    }
    let needle = query.to_lowercase();
    rows.iter()
        .filter(|p| {
            contains_ci(p.name.as_deref(), &needle)
                || p.seat_no.contains(query)
                || contains_ci(p.payment_method.as_deref(), &needle)
        })
        .collect()
}

/// Поиск по категории и описанию без учёта регистра.
pub fn search_expenses<'a>(rows: &'a [Expense], query: &str) -> Vec<&'a Expense> {
    if query.is_empty() {
        return rows.iter().collect();
    }
    let needle = query.to_lowercase();
    rows.iter()
        .filter(|e| contains_ci(e.category.as_deref(), &needle) || contains_ci(e.description.as_deref(), &needle))
        .collect()
}

#[derive(Clone)]
pub struct ReportService {
    backend: BackendClient,
}

impl ReportService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// Абсолютные ссылки остаются как есть, относительные дополняются адресом бэкенда.
    pub fn invoice_href(&self, url: &str) -> String {
        if url.starts_with("http") {
            url.to_string()
        } else {
            format!("{}{}", self.backend.base_url(), url)
        }
    }

    pub async fn summary(&self, period: &PeriodFilter, search: &str, today: NaiveDate) -> ServiceResult<ReportSummary> {
        debug!("building report summary for {:?}", period);
        let (payments, expenses, profit, totals) = futures::try_join!(
            self.backend.payments(period),
            self.backend.expenses(period),
            self.backend.net_profit(period),
            self.backend.dashboard_totals(period)
        )?;

        let month_payments = month_payments_total(&payments, today);
        let month_expenses = month_expenses_total(&expenses, today);

        let payment_series = payments
            .iter()
            .map(|p| ChartPoint { date: p.date.clone(), amount: p.amount })
            .collect();
        let expense_series = expenses
            .iter()
            .map(|e| ChartPoint { date: e.date.clone(), amount: e.amount })
            .collect();

        let payment_rows = search_payments(&payments, search)
            .into_iter()
            .map(|p| PaymentRow {
                record: p.clone(),
                invoice_href: p
                    .invoice_url
                    .as_deref()
                    .filter(|u| !u.is_empty())
                    .map(|u| self.invoice_href(u)),
            })
            .collect();
        let expense_rows = search_expenses(&expenses, search).into_iter().cloned().collect();

        Ok(ReportSummary {
            total_collected: totals.total_collected,
            total_expenses: totals.total_expenses,
            net_profit: profit.net_profit,
            month_payments,
            month_expenses,
            monthly_income: month_payments - month_expenses,
            payments: payment_rows,
            expenses: expense_rows,
            payment_series,
            expense_series,
        })
    }

    pub async fn download(&self, format: ReportFormat, period: &PeriodFilter) -> ServiceResult<ReportDownload> {
        let bytes = self.backend.financial_report(format, period).await?;
        Ok(ReportDownload {
            bytes,
            content_type: format.content_type(),
            filename: format!("financial_report.{}", format.extension()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(date: &str, seat: &str, name: &str, amount: f64, method: &str) -> PaymentRecord {
        PaymentRecord {
            date: Some(date.to_string()),
            seat_no: seat.to_string(),
            name: Some(name.to_string()),
            amount,
            payment_method: Some(method.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn month_totals_skip_other_months_and_bad_dates() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let rows = vec![
            payment("2025-06-01", "1", "A", 800.0, "Cash"),
            payment("2025-06-30T10:00:00", "2", "B", 500.0, "UPI"),
            payment("2025-05-31", "3", "C", 700.0, "Cash"),
            payment("soon", "4", "D", 900.0, "Card"),
        ];
        assert_eq!(month_payments_total(&rows, today), 1300.0);
    }

    #[test]
    fn payment_search() {
        let rows = vec![
            payment("2025-06-01", "12", "Anita", 800.0, "Cash"),
            payment("2025-06-01", "3_A", "Ravi", 500.0, "UPI"),
        ];
        assert_eq!(search_payments(&rows, "").len(), 2);
        assert_eq!(search_payments(&rows, "anI")[0].seat_no, "12");
        assert_eq!(search_payments(&rows, "upi")[0].seat_no, "3_A");
        assert_eq!(search_payments(&rows, "3_A").len(), 1);
        assert!(search_payments(&rows, "3_a").is_empty());
    }

    #[test]
    fn expense_search() {
        let rows = vec![
            Expense { category: Some("Rent".into()), description: Some("June".into()), ..Default::default() },
            Expense { category: Some("Utilities".into()), description: None, ..Default::default() },
        ];
        assert_eq!(search_expenses(&rows, "june").len(), 1);
        assert_eq!(search_expenses(&rows, "UTIL").len(), 1);
    }
}
