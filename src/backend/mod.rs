pub mod client;
pub mod error;
pub mod period;

pub use client::{BackendClient, NewExpense, PaymentSubmission, ReportFormat, StudentAssignment};
pub use error::{BackendError, BackendResult};
pub use period::{parse_filter_date, PeriodFilter, PeriodParams};
