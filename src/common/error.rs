use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use crate::common::response::ApiError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid style '{0}'. Choose 'realistic', 'cartoon', or 'abstract'.")]
    InvalidStyle(String),

    #[error("{provider} returned HTTP {status}: {message}")]
    Provider {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("{provider} sent an unexpected response: {detail}")]
    ProviderContractViolation {
        provider: &'static str,
        detail: String,
    },

    #[error("{provider} is unavailable: {detail}")]
    ProviderUnavailable {
        provider: &'static str,
        detail: String,
    },

    #[error("{provider} job {job_id} failed: {reason}")]
    ProviderJobFailed {
        provider: &'static str,
        job_id: String,
        reason: String,
    },

    #[error("job {job_id} timed out after {attempts} status checks ({elapsed:?})")]
    Timeout {
        job_id: String,
        attempts: u32,
        elapsed: Duration,
    },

    #[error("request cancelled")]
    Cancelled,

    #[error("storage error: {0}")]
    Storage(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn contract(provider: &'static str, detail: impl Into<String>) -> Self {
        Self::ProviderContractViolation {
            provider,
            detail: detail.into(),
        }
    }

    pub fn unavailable(provider: &'static str, detail: impl std::fmt::Display) -> Self {
        Self::ProviderUnavailable {
            provider,
            detail: detail.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidStyle(_) => StatusCode::BAD_REQUEST,
            AppError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Provider { .. }
            | AppError::ProviderContractViolation { .. }
            | AppError::ProviderUnavailable { .. }
            | AppError::ProviderJobFailed { .. }
            | AppError::Timeout { .. }
            | AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Failures worth another status check: transport errors, throttling and upstream 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::ProviderUnavailable { .. } => true,
            AppError::Provider { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        ApiError(self.to_string(), status).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct TopicForm {
        #[validate(length(min = 1, message = "Topic is required"))]
        topic: String,
    }

    #[test]
    fn validation_errors_keep_their_messages() {
        let err: AppError = TopicForm { topic: String::new() }.validate().unwrap_err().into();
        assert!(matches!(&err, AppError::Validation(m) if m == "Topic is required"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn provider_failures_map_to_500() {
        let err = AppError::Provider {
            provider: "openai",
            status: 401,
            message: "bad key".into(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.is_transient());

        let throttled = AppError::Provider {
            provider: "openai",
            status: 429,
            message: "slow down".into(),
        };
        assert!(throttled.is_transient());
        assert!(AppError::unavailable("sync", "connection reset").is_transient());
        assert!(!AppError::contract("sync", "missing id").is_transient());
    }
}
