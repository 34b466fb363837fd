use thiserror::Error;

/// Failures talking to the remote backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport, timeout or body decoding failure
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
}

impl BackendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            BackendError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;
