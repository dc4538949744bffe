//! Centralized API error handling for Wanderwise
//!
//! This module provides a unified error type for API responses with proper
//! HTTP status code mapping and JSON error responses.
//!
//! Two deliberate conflations are preserved from the observed behavior:
//! wrong email and wrong password both surface as `InvalidCredentials`, and a
//! missing account is indistinguishable from a disabled one behind a bearer
//! token (`Unauthenticated`). Do not split these cases; the identical wording
//! is what prevents account enumeration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error type with HTTP status code mapping
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("Access denied. No token provided.")]
    TokenMissing,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid credentials. Please check your email and password.")]
    InvalidCredentials,

    #[error("User not found or account disabled")]
    Unauthenticated,

    #[error("Your account has been disabled.")]
    AccountDisabled,

    #[error("Access denied. You do not have the required permissions.")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("An internal server error occurred.")]
    Internal(String),
}

/// JSON error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// Error details in the response
#[derive(Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl ApiError {
    /// Get the error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Duplicate(_) => "DUPLICATE_CREDENTIAL",
            ApiError::TokenMissing => "TOKEN_MISSING",
            ApiError::TokenInvalid => "INVALID_TOKEN",
            ApiError::TokenExpired => "TOKEN_EXPIRED",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::AccountDisabled => "ACCOUNT_DISABLED",
            ApiError::Forbidden => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Duplicate(_) => StatusCode::BAD_REQUEST,
            ApiError::TokenMissing
            | ApiError::TokenInvalid
            | ApiError::TokenExpired
            | ApiError::InvalidCredentials
            | ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::AccountDisabled | ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        // Internal detail is logged server-side only; the response body stays generic.
        if let ApiError::Internal(detail) = &self {
            tracing::error!(detail = %detail, code = %error_code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = %error_code, "Client error occurred");
        }

        let body = ErrorResponse {
            error: ErrorDetails {
                code: error_code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias using ApiError
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ApiError::Validation("test".to_string()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(ApiError::TokenMissing.error_code(), "TOKEN_MISSING");
        assert_eq!(ApiError::TokenExpired.error_code(), "TOKEN_EXPIRED");
        assert_eq!(
            ApiError::InvalidCredentials.error_code(),
            "INVALID_CREDENTIALS"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Duplicate("taken".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        // Missing, invalid, and expired tokens share a status and differ only in message.
        assert_eq!(ApiError::TokenMissing.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::TokenInvalid.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::TokenExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::AccountDisabled.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_error_body_is_generic() {
        let err = ApiError::Internal("connection pool exhausted".to_string());
        assert_eq!(err.to_string(), "An internal server error occurred.");
    }

    #[test]
    fn test_missing_and_disabled_accounts_report_identically() {
        // Single message for both cases; callers cannot tell which occurred.
        assert_eq!(
            ApiError::Unauthenticated.to_string(),
            "User not found or account disabled"
        );
    }
}
