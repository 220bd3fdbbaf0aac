use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::shared::types::ApiResponse;

/// A single failed form field, reported with its wire name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation failed on {} field(s)", .0.len())]
    ValidationFailed(Vec<FieldError>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited {
        retry_after_secs: u64,
        limit: u32,
        reset_at: DateTime<Utc>,
    },
}

impl AppError {
    /// First failing field for validation errors, `None` otherwise
    pub fn first_field(&self) -> Option<&str> {
        match self {
            AppError::ValidationFailed(fields) => fields.first().map(|f| f.field.as_str()),
            _ => None,
        }
    }
}

/// Errors shared between coalesced cache loads
impl From<Arc<AppError>> for AppError {
    fn from(shared: Arc<AppError>) -> Self {
        Arc::try_unwrap(shared).unwrap_or_else(|shared| AppError::Internal(shared.to_string()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::RateLimited {
            retry_after_secs,
            limit,
            reset_at,
        } = self
        {
            let body = Json(ApiResponse {
                success: false,
                data: Some(json!({ "retryAfter": retry_after_secs })),
                message: Some("Too many requests. Please try again later.".to_string()),
                meta: None,
                errors: None,
            });
            let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
            let headers = response.headers_mut();
            headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
            headers.insert("x-ratelimit-limit", HeaderValue::from(limit));
            headers.insert("x-ratelimit-remaining", HeaderValue::from(0u32));
            headers.insert(
                "x-ratelimit-reset",
                HeaderValue::from(reset_at.timestamp_millis()),
            );
            return response;
        }

        if let AppError::ValidationFailed(ref fields) = self {
            let body = Json(ApiResponse {
                success: false,
                data: Some(json!({ "field": self.first_field().unwrap_or("unknown") })),
                message: Some("Validation failed".to_string()),
                meta: None,
                errors: Some(fields.iter().map(|f| f.to_string()).collect()),
            });
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        let (status, message, errors) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    None,
                )
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred. Please try again later.".to_string(),
                    None,
                )
            }
            AppError::Auth(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Unauthorized(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::ExternalServiceError(ref msg) => {
                tracing::error!("External service error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone(), None)
            }
            AppError::ServiceUnavailable(ref msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Email service is currently unavailable. Please try again later or contact us directly."
                        .to_string(),
                    None,
                )
            }
            AppError::Timeout(ref msg) => {
                tracing::warn!("Timeout: {}", msg);
                (
                    StatusCode::REQUEST_TIMEOUT,
                    "Request timed out. Please try again.".to_string(),
                    None,
                )
            }
            AppError::RateLimited { .. } | AppError::ValidationFailed(_) => {
                unreachable!("handled above")
            }
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_response_carries_retry_headers() {
        let response = AppError::RateLimited {
            retry_after_secs: 42,
            limit: 3,
            reset_at: Utc::now(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "42");
        assert_eq!(response.headers()["x-ratelimit-limit"], "3");
        assert_eq!(response.headers()["x-ratelimit-remaining"], "0");
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::ValidationFailed(vec![]), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Timeout("x".into()), StatusCode::REQUEST_TIMEOUT),
            (
                AppError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_first_field() {
        let error = AppError::ValidationFailed(vec![
            FieldError {
                field: "name".to_string(),
                message: "too short".to_string(),
            },
            FieldError {
                field: "phone".to_string(),
                message: "too short".to_string(),
            },
        ]);
        assert_eq!(error.first_field(), Some("name"));
        assert_eq!(AppError::NotFound("x".into()).first_field(), None);
    }
}
