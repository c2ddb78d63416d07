//! Narrow card-display types forwarded from Stripe.
//!
//! Stripe's payment method objects carry dozens of fields; CardVault only
//! reads the handful needed to render a saved card. Keeping the narrow shape
//! here isolates the rest of the vendor schema from the whole workspace.
//!
//! Field names inside `card` deliberately keep Stripe's snake_case so the
//! list endpoint forwards records unchanged.

use serde::{Deserialize, Serialize};

use super::id::PaymentMethodId;

/// Display metadata for a saved card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSummary {
    /// Card brand, e.g. `visa` or `mastercard`.
    pub brand: String,
    /// Last four digits of the card number.
    pub last4: String,
    /// Expiry month (1-12).
    pub exp_month: u8,
    /// Four-digit expiry year.
    pub exp_year: u16,
}

/// A card payment method attached to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPaymentMethod {
    /// Opaque payment method id (`pm_…`).
    pub id: PaymentMethodId,
    /// Card display fields.
    pub card: CardSummary,
}
