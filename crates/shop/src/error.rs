//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` covering the five failure kinds this
//! service can produce. Server-class errors are captured to Sentry before
//! responding. All route handlers return `Result<T, AppError>`; responses
//! are JSON `{"error": "..."}` bodies the UI layer renders verbatim.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::stripe::StripeError;

/// Application-level error type for the shop service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing required input. The caller's fault; never
    /// retried internally.
    #[error("{0}")]
    Validation(String),

    /// Referenced product, session, or update target does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Actor lacks the admin capability.
    #[error("not authorized")]
    Forbidden,

    /// Upstream payment processor failure.
    #[error("payment gateway error: {0}")]
    Gateway(#[from] StripeError),

    /// Document store unavailable or write rejected.
    #[error("store error: {0}")]
    Store(#[from] RepositoryError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            // Preserve the upstream status when the processor produced one;
            // transport-level failures have none.
            Self::Gateway(err) => err
                .upstream_status()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Self::Store(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            // Don't leak connection strings or SQL in responses
            Self::Store(RepositoryError::NotFound) => "not found".to_string(),
            Self::Store(_) => "internal error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            &self,
            Self::Gateway(_) | Self::Store(RepositoryError::Database(_))
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status_code();
        let body = Json(json!({ "error": self.public_message() }));

        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
