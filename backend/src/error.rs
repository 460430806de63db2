//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use onelifetime_shared::types::{ErrorDetail, ErrorResponse};
use onelifetime_shared::validation::ValidationError;
use onelifetime_shared::CalculationError;
use thiserror::Error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field: None,
        }
    }

    pub fn field(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation {
            message: err.user_message(),
            field: Some(err.field),
        }
    }
}

impl From<CalculationError> for ApiError {
    fn from(err: CalculationError) -> Self {
        match err {
            CalculationError::InvalidTimezone(_) => ApiError::field("timezone", err.to_string()),
            CalculationError::AmbiguousLocalTime { .. }
            | CalculationError::NonexistentLocalTime { .. } => {
                ApiError::field("birth_time", err.to_string())
            }
            CalculationError::BirthOutOfRange(_) => ApiError::field("birth_date", err.to_string()),
            CalculationError::InvalidLifeExpectancy(_) => ApiError::validation(err.to_string()),
            CalculationError::MissingCountryData { .. } => ApiError::NotFound(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match &self {
            ApiError::Validation { message, field } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                message.clone(),
                field.clone(),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
