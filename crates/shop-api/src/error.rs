//! # API Errors
//!
//! Maps `ShopError` and body rejections onto `{error, code}` JSON responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shop_core::ShopError;
use thiserror::Error;
use tracing::error;

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Anything a handler can fail with
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Shop(#[from] ShopError),

    #[error("invalid JSON body")]
    Body(#[from] JsonRejection),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Shop(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::Body(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn body(&self) -> ErrorResponse {
        let code = self.status().as_u16();
        match self {
            ApiError::Shop(e) if e.is_client_error() => ErrorResponse::new(e.to_string(), code),
            ApiError::Shop(e @ ShopError::Persistence(_)) => {
                error!(error = %e, "request failed in storage");
                ErrorResponse::new("database operation failed", code)
            }
            ApiError::Shop(e) => {
                error!(error = %e, "request failed");
                ErrorResponse::new("internal server error", code)
            }
            ApiError::Body(rejection) => {
                ErrorResponse::new(self.to_string(), code).with_details(rejection.body_text())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400);
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
        assert!(err.details.is_none());
    }

    #[test]
    fn test_client_error_keeps_message() {
        let err = ApiError::from(ShopError::invalid("cart is empty"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body().error, "cart is empty");

        let err = ApiError::from(ShopError::not_found("product ID 7 not found"));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_server_error_hides_detail() {
        let err = ApiError::from(ShopError::persistence("connection refused on 10.0.0.5"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body().error, "database operation failed");

        let err = ApiError::from(ShopError::Internal("worker panicked".into()));
        assert_eq!(err.body().error, "internal server error");
    }
}
