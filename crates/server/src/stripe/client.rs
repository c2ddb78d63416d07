//! Stripe REST client implementation.
//!
//! One `reqwest::Client` shared behind an `Arc`; every call is a single
//! form-encoded request with the secret key as bearer auth and a pinned
//! `Stripe-Version` header.

use std::sync::Arc;

use cardvault_core::{CustomerId, PaymentMethodId, SavedPaymentMethod, SetupIntentId};
use reqwest::RequestBuilder;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::config::StripeConfig;
use crate::stripe::types::{Customer, List, SetupIntent};
use crate::stripe::{ErrorEnvelope, StripeError};

/// Client for the Stripe REST API.
///
/// Exposes only the handful of endpoints CardVault needs: customer
/// retrieve/list/create, setup-intent create/retrieve, and payment-method
/// list/detach.
#[derive(Clone)]
pub struct StripeClient {
    inner: Arc<StripeClientInner>,
}

struct StripeClientInner {
    client: reqwest::Client,
    /// API base with no trailing slash, e.g. `https://api.stripe.com`.
    api_base: String,
    api_version: String,
    secret_key: String,
}

impl StripeClient {
    /// Create a new Stripe API client.
    #[must_use]
    pub fn new(config: &StripeConfig) -> Self {
        let api_base = config.api_base.as_str().trim_end_matches('/').to_string();

        Self {
            inner: Arc::new(StripeClientInner {
                client: reqwest::Client::new(),
                api_base,
                api_version: config.api_version.clone(),
                secret_key: config.secret_key.expose_secret().to_string(),
            }),
        }
    }

    // =========================================================================
    // Customer Methods
    // =========================================================================

    /// Retrieve a customer by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer does not exist or the request fails.
    #[instrument(skip(self), fields(customer = %customer))]
    pub async fn retrieve_customer(&self, customer: &CustomerId) -> Result<Customer, StripeError> {
        self.get(&format!("/v1/customers/{customer}"), &[]).await
    }

    /// Find an existing customer by exact email match.
    ///
    /// Fetches at most one result; with several matches Stripe returns the
    /// most recently created first, and that one wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, email))]
    pub async fn find_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Customer>, StripeError> {
        let page: List<Customer> = self
            .get("/v1/customers", &[("email", email), ("limit", "1")])
            .await?;
        Ok(page.data.into_iter().next())
    }

    /// Create a customer, anonymous when no email is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, email), fields(anonymous = email.is_none()))]
    pub async fn create_customer(&self, email: Option<&str>) -> Result<Customer, StripeError> {
        let form: Vec<(&str, &str)> = match email {
            Some(email) => vec![("email", email)],
            None => Vec::new(),
        };
        self.post("/v1/customers", &form).await
    }

    // =========================================================================
    // Setup Intent Methods
    // =========================================================================

    /// Create a card setup intent scoped to a customer.
    ///
    /// Fixed to card confirmation, configured for later off-session reuse,
    /// and tagged `type=card_validation` so the intent is recognizable in
    /// the Stripe dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer is unknown or the request fails.
    #[instrument(skip(self), fields(customer = %customer))]
    pub async fn create_setup_intent(
        &self,
        customer: &CustomerId,
    ) -> Result<SetupIntent, StripeError> {
        self.post(
            "/v1/setup_intents",
            &[
                ("customer", customer.as_str()),
                ("payment_method_types[]", "card"),
                ("usage", "off_session"),
                ("metadata[type]", "card_validation"),
            ],
        )
        .await
    }

    /// Retrieve a setup intent by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the intent does not exist or the request fails.
    #[instrument(skip(self), fields(setup_intent = %setup_intent))]
    pub async fn retrieve_setup_intent(
        &self,
        setup_intent: &SetupIntentId,
    ) -> Result<SetupIntent, StripeError> {
        self.get(&format!("/v1/setup_intents/{setup_intent}"), &[])
            .await
    }

    // =========================================================================
    // Payment Method Methods
    // =========================================================================

    /// List the card payment methods attached to a customer.
    ///
    /// Returns a single page with Stripe's default page size; the demo never
    /// saves enough cards to need pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(customer = %customer))]
    pub async fn list_card_payment_methods(
        &self,
        customer: &CustomerId,
    ) -> Result<Vec<SavedPaymentMethod>, StripeError> {
        let page: List<SavedPaymentMethod> = self
            .get(
                "/v1/payment_methods",
                &[("customer", customer.as_str()), ("type", "card")],
            )
            .await?;
        Ok(page.data)
    }

    /// Detach a payment method from its customer.
    ///
    /// Stripe rejects detaching an unknown or already-detached method; that
    /// error is surfaced as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the method cannot be detached or the request
    /// fails.
    #[instrument(skip(self), fields(payment_method = %payment_method))]
    pub async fn detach_payment_method(
        &self,
        payment_method: &PaymentMethodId,
    ) -> Result<SavedPaymentMethod, StripeError> {
        self.post(&format!("/v1/payment_methods/{payment_method}/detach"), &[])
            .await
    }

    // =========================================================================
    // Request Plumbing
    // =========================================================================

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, StripeError> {
        let request = self
            .inner
            .client
            .get(format!("{}{path}", self.inner.api_base))
            .query(query);
        self.send(request).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<T, StripeError> {
        let request = self
            .inner
            .client
            .post(format!("{}{path}", self.inner.api_base))
            .form(form);
        self.send(request).await
    }

    /// Execute a request and decode the response through one chokepoint.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StripeError> {
        let response = request
            .bearer_auth(&self.inner.secret_key)
            .header("Stripe-Version", &self.inner.api_version)
            .send()
            .await?;

        let status = response.status();

        // Get the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            return Err(map_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse Stripe response"
            );
            StripeError::Parse(e)
        })
    }
}

/// Map a non-success response to a typed error.
///
/// Stripe error bodies are `{"error": {message, type, code}}`; anything else
/// (proxies, malformed bodies) is kept with its status and a body snippet.
fn map_error(status: u16, body: &str) -> StripeError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => StripeError::Api {
            status,
            message: envelope
                .error
                .message
                .unwrap_or_else(|| format!("Stripe request failed (HTTP {status})")),
            error_type: envelope.error.error_type,
            code: envelope.error.code,
        },
        Err(_) => StripeError::Unexpected {
            status,
            body: body.chars().take(200).collect(),
        },
    }
}
