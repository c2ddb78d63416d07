//! Narrow views over Stripe API objects.
//!
//! Only the fields CardVault reads are declared; serde drops the rest of the
//! vendor schema on the floor. References (`customer`, `payment_method`) are
//! kept as plain ids since CardVault never asks Stripe to expand them.

use cardvault_core::{CustomerId, PaymentMethodId, SetupIntentId};
use serde::Deserialize;

/// A Stripe customer.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    /// Opaque customer id (`cus_…`).
    pub id: CustomerId,
    /// Email the customer was created with, if any.
    pub email: Option<String>,
}

/// A Stripe setup intent.
#[derive(Debug, Clone, Deserialize)]
pub struct SetupIntent {
    /// Opaque setup intent id (`seti_…`).
    pub id: SetupIntentId,
    /// Lifecycle state, e.g. `requires_payment_method` or `succeeded`.
    pub status: String,
    /// Secret the browser uses to confirm the intent with Stripe.js.
    pub client_secret: String,
    /// Owning customer reference.
    pub customer: Option<CustomerId>,
    /// Payment method attached by a successful confirmation.
    pub payment_method: Option<PaymentMethodId>,
}

/// One page of a Stripe list response: `{"object": "list", "data": […]}`.
#[derive(Debug, Deserialize)]
pub struct List<T> {
    pub data: Vec<T>,
}
