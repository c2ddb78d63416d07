//! Payment service: the four operations the API exposes.
//!
//! Each operation is a stateless translation between the API payloads and
//! one or two sequential Stripe calls. The setup-intent lifecycle itself is
//! owned and driven by Stripe; this service only creates intents and reads
//! them back.

use cardvault_core::{
    CreateSetupIntentRequest, CustomerId, PaymentMethodId, PaymentMethodList,
    PaymentMethodRemoved, SetupIntentCreated, SetupIntentId, SetupIntentStatus,
};

use crate::stripe::{Customer, StripeClient, StripeError};

/// Fixed confirmation message returned by a successful detach.
const REMOVED_MESSAGE: &str = "Payment method removed successfully";

/// Service wrapping the Stripe client with the payment API's semantics.
pub struct PaymentService<'a> {
    stripe: &'a StripeClient,
}

impl<'a> PaymentService<'a> {
    /// Create a payment service borrowing the shared Stripe client.
    #[must_use]
    pub const fn new(stripe: &'a StripeClient) -> Self {
        Self { stripe }
    }

    /// Create a setup intent for card validation, resolving the customer
    /// first.
    ///
    /// Resolution order: explicit id wins; then exact-email reuse (first
    /// match of a single-result page) or creation with that email; with
    /// neither, an anonymous customer. Two concurrent requests with the same
    /// unseen email can both observe "no match" and create duplicates - an
    /// accepted race, since Stripe enforces no email uniqueness.
    ///
    /// A customer created here persists upstream even if the subsequent
    /// setup-intent creation fails; nothing is rolled back.
    ///
    /// # Errors
    ///
    /// Returns an error if the given customer id is unknown or any Stripe
    /// call fails.
    pub async fn create_setup_intent(
        &self,
        request: CreateSetupIntentRequest,
    ) -> Result<SetupIntentCreated, StripeError> {
        let customer = self.resolve_customer(&request).await?;
        let intent = self.stripe.create_setup_intent(&customer.id).await?;

        tracing::info!(
            customer = %customer.id,
            setup_intent = %intent.id,
            "Created setup intent"
        );

        Ok(SetupIntentCreated {
            client_secret: intent.client_secret,
            customer_id: customer.id,
            setup_intent_id: intent.id,
        })
    }

    /// List the card payment methods saved for a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the Stripe call fails.
    pub async fn saved_payment_methods(
        &self,
        customer: &CustomerId,
    ) -> Result<PaymentMethodList, StripeError> {
        let payment_methods = self.stripe.list_card_payment_methods(customer).await?;
        Ok(PaymentMethodList { payment_methods })
    }

    /// Read back the current status of a setup intent.
    ///
    /// # Errors
    ///
    /// Returns an error if the intent is unknown or the Stripe call fails.
    pub async fn setup_intent_status(
        &self,
        setup_intent: &SetupIntentId,
    ) -> Result<SetupIntentStatus, StripeError> {
        let intent = self.stripe.retrieve_setup_intent(setup_intent).await?;
        Ok(SetupIntentStatus {
            status: intent.status,
            payment_method: intent.payment_method,
            customer: intent.customer,
        })
    }

    /// Detach a payment method from its customer.
    ///
    /// Detaching an unknown or already-detached method is not special-cased;
    /// Stripe's rejection surfaces as an upstream error.
    ///
    /// # Errors
    ///
    /// Returns an error if Stripe rejects the detach.
    pub async fn remove_payment_method(
        &self,
        payment_method: &PaymentMethodId,
    ) -> Result<PaymentMethodRemoved, StripeError> {
        let detached = self.stripe.detach_payment_method(payment_method).await?;

        tracing::info!(payment_method = %detached.id, "Detached payment method");

        Ok(PaymentMethodRemoved {
            payment_method_id: detached.id,
            message: REMOVED_MESSAGE.to_string(),
        })
    }

    /// Resolve the customer a setup intent will be scoped to.
    async fn resolve_customer(
        &self,
        request: &CreateSetupIntentRequest,
    ) -> Result<Customer, StripeError> {
        if let Some(customer_id) = &request.customer_id {
            return self.stripe.retrieve_customer(customer_id).await;
        }

        if let Some(email) = &request.customer_email {
            if let Some(existing) = self.stripe.find_customer_by_email(email).await? {
                tracing::debug!(customer = %existing.id, "Reusing customer by email");
                return Ok(existing);
            }
            return self.stripe.create_customer(Some(email)).await;
        }

        // Neither id nor email: anonymous customer
        self.stripe.create_customer(None).await
    }
}
