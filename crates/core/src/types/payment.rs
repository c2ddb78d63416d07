//! Request and response payloads of the four payment API operations.
//!
//! Outer payload keys are camelCase on the wire; the nested `card` object in
//! [`SavedPaymentMethod`] keeps Stripe's snake_case field names.

use serde::{Deserialize, Serialize};

use super::card::SavedPaymentMethod;
use super::id::{CustomerId, PaymentMethodId, SetupIntentId};

/// Request body for `POST /api/payment/create-payment-intent`.
///
/// Both fields are optional; `customer_id` takes precedence when present.
/// With neither, an anonymous customer is created.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSetupIntentRequest {
    /// Existing customer to attach the setup intent to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    /// Email used to look up or create a customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

/// Success payload of `create-payment-intent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupIntentCreated {
    /// Secret the browser hands to Stripe.js to confirm the card entry.
    pub client_secret: String,
    /// The customer the setup intent is scoped to.
    pub customer_id: CustomerId,
    /// The created setup intent.
    pub setup_intent_id: SetupIntentId,
}

/// Success payload of `GET /api/payment/payment-methods/{customerId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodList {
    /// Card payment methods attached to the customer, one upstream page.
    pub payment_methods: Vec<SavedPaymentMethod>,
}

/// Success payload of `GET /api/payment/payment-intent/{paymentIntentId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupIntentStatus {
    /// Lifecycle state as reported by Stripe, e.g. `succeeded`.
    pub status: String,
    /// Payment method attached by a successful confirmation, if any.
    pub payment_method: Option<PaymentMethodId>,
    /// Owning customer reference.
    pub customer: Option<CustomerId>,
}

/// Success payload of `DELETE /api/payment/payment-method/{paymentMethodId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodRemoved {
    /// The detached payment method.
    pub payment_method_id: PaymentMethodId,
    /// Fixed confirmation message.
    pub message: String,
}

/// Success payload of `GET /api/payment/config`.
///
/// Hands the browser the publishable key it needs to initialize Stripe.js.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishableKey {
    /// Stripe publishable key (`pk_…`), safe to expose to the browser.
    pub publishable_key: String,
}
