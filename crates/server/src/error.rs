//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures upstream failures to
//! Sentry and renders the failure half of the response envelope. All route
//! handlers return `Result<T, AppError>`, so this `IntoResponse` impl is the
//! single place error JSON is produced.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cardvault_core::ApiResponse;
use thiserror::Error;

use crate::stripe::StripeError;

/// Application-level error type for the payment API.
///
/// Two kinds only, mirroring the API contract: a missing required parameter
/// is a 400 caught before any upstream call; everything Stripe raises is a
/// 500 carrying the raw upstream message.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required path parameter is blank.
    #[error("{0}")]
    BadRequest(String),

    /// Stripe API operation failed.
    #[error("Stripe error: {0}")]
    Stripe(#[from] StripeError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture upstream errors to Sentry
        if matches!(self, Self::Stripe(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            // Not-found upstream is not distinguished from transient failure
            Self::Stripe(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // The client sees the upstream message verbatim, not the variant wrapper
        let message = match &self {
            Self::BadRequest(message) => message.clone(),
            Self::Stripe(err) => err.to_string(),
        };

        (status, Json(ApiResponse::<()>::err(message))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
