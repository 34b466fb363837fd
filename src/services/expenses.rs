use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::backend::{parse_filter_date, BackendClient, NewExpense, PeriodFilter};
use crate::error::{ServiceError, ServiceResult};
use crate::models::Expense;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddExpenseRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub category: String,
    #[validate(range(exclusive_min = 0.0, message = "must be a positive amount"))]
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, message = "is required"))]
    pub date: String,
}

#[derive(Clone)]
pub struct ExpenseService {
    backend: BackendClient,
}

impl ExpenseService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    pub async fn list(&self, period: &PeriodFilter) -> ServiceResult<Vec<Expense>> {
        Ok(self.backend.expenses(period).await?)
    }

    pub async fn add(&self, request: AddExpenseRequest) -> ServiceResult<()> {
        request.validate()?;
        if request.category.trim().is_empty() {
            return Err(ServiceError::Validation("category is required".to_string()));
        }
        let date = parse_filter_date(&request.date)
            .ok_or_else(|| ServiceError::Validation(format!("date {:?} is not a valid date", request.date)))?;

        let expense = NewExpense {
            category: request.category.trim().to_string(),
            amount: request.amount,
            description: request.description,
            date: date.format("%Y-%m-%d").to_string(),
        };
        self.backend.add_expense(&expense).await?;
        info!("expense added: {} {} on {}", expense.category, expense.amount, expense.date);
        Ok(())
    }
}
