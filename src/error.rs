use thiserror::Error;

use crate::backend::BackendError;

/// Errors surfaced by the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("{0}")]
    Validation(String),

    #[error("access denied")]
    Unauthorized,

    #[error("session lifetime of {0} hours is out of range")]
    SessionLifetime(i64),

    #[error("session token error: {0}")]
    Session(#[from] jsonwebtoken::errors::Error),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let message = errs
                    .iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{field} {message}")
            })
            .collect();
        fields.sort();
        ServiceError::Validation(fields.join("; "))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
