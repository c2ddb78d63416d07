//! Payment API route handlers.
//!
//! Each handler validates input shape, delegates to [`PaymentService`], and
//! wraps the result in the uniform `{success, data?, error?}` envelope.
//! Failures never short-circuit to hand-built JSON: returning `AppError`
//! produces the envelope through one `IntoResponse` path.

use axum::{
    Json,
    extract::{Path, State},
};
use cardvault_core::{
    ApiResponse, CreateSetupIntentRequest, CustomerId, PaymentMethodId, PaymentMethodList,
    PaymentMethodRemoved, PublishableKey, SetupIntentCreated, SetupIntentId, SetupIntentStatus,
};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::PaymentService;
use crate::state::AppState;

/// Create a setup intent for card validation.
///
/// POST /api/payment/create-payment-intent
///
/// Resolves the customer (explicit id, then email reuse-or-create, then
/// anonymous) and opens a card setup intent against them. The returned
/// client secret lets the browser confirm card entry directly with Stripe.
///
/// # Errors
///
/// Any Stripe failure surfaces as a 500 envelope.
#[instrument(skip(state, request))]
pub async fn create_setup_intent(
    State(state): State<AppState>,
    Json(request): Json<CreateSetupIntentRequest>,
) -> Result<Json<ApiResponse<SetupIntentCreated>>> {
    let created = PaymentService::new(state.stripe())
        .create_setup_intent(request)
        .await?;
    Ok(Json(ApiResponse::ok(created)))
}

/// List the card payment methods saved for a customer.
///
/// GET /api/payment/payment-methods/{customerId}
///
/// # Errors
///
/// Returns a 400 envelope when the id is blank, before any upstream call.
#[instrument(skip(state))]
pub async fn list_payment_methods(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<ApiResponse<PaymentMethodList>>> {
    let customer = CustomerId::new(require_param(&customer_id, "Customer ID is required")?);
    let list = PaymentService::new(state.stripe())
        .saved_payment_methods(&customer)
        .await?;
    Ok(Json(ApiResponse::ok(list)))
}

/// Read back the status of a setup intent.
///
/// GET /api/payment/payment-intent/{paymentIntentId}
///
/// # Errors
///
/// Returns a 400 envelope when the id is blank, before any upstream call.
#[instrument(skip(state))]
pub async fn setup_intent_status(
    State(state): State<AppState>,
    Path(payment_intent_id): Path<String>,
) -> Result<Json<ApiResponse<SetupIntentStatus>>> {
    let setup_intent = SetupIntentId::new(require_param(
        &payment_intent_id,
        "Payment Intent ID is required",
    )?);
    let status = PaymentService::new(state.stripe())
        .setup_intent_status(&setup_intent)
        .await?;
    Ok(Json(ApiResponse::ok(status)))
}

/// Detach a payment method from its customer.
///
/// DELETE /api/payment/payment-method/{paymentMethodId}
///
/// # Errors
///
/// Returns a 400 envelope when the id is blank; a rejected detach (unknown
/// or already detached) surfaces Stripe's message as a 500 envelope.
#[instrument(skip(state))]
pub async fn remove_payment_method(
    State(state): State<AppState>,
    Path(payment_method_id): Path<String>,
) -> Result<Json<ApiResponse<PaymentMethodRemoved>>> {
    let payment_method = PaymentMethodId::new(require_param(
        &payment_method_id,
        "Payment Method ID is required",
    )?);
    let removed = PaymentService::new(state.stripe())
        .remove_payment_method(&payment_method)
        .await?;
    Ok(Json(ApiResponse::ok(removed)))
}

/// Hand the browser the publishable key for Stripe.js.
///
/// GET /api/payment/config
#[instrument(skip(state))]
pub async fn publishable_key(
    State(state): State<AppState>,
) -> Json<ApiResponse<PublishableKey>> {
    Json(ApiResponse::ok(PublishableKey {
        publishable_key: state.config().stripe.publishable_key.clone(),
    }))
}

/// Reject blank path parameters with a fixed message before any upstream
/// call is made.
fn require_param<'a>(value: &'a str, message: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(message.to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_require_param_accepts_value() {
        assert_eq!(
            require_param("cus_123", "Customer ID is required").unwrap(),
            "cus_123"
        );
    }

    #[test]
    fn test_require_param_trims_whitespace() {
        assert_eq!(
            require_param("  pm_1  ", "Payment Method ID is required").unwrap(),
            "pm_1"
        );
    }

    #[test]
    fn test_require_param_rejects_blank() {
        let err = require_param("   ", "Customer ID is required").unwrap_err();
        assert_eq!(err.to_string(), "Customer ID is required");
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
