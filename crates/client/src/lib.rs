//! CardVault Client - Typed HTTP client for the payment API.
//!
//! One function per backend operation. Each performs a single network call
//! and returns the parsed `{success, data?, error?}` envelope unmodified:
//! no retry, no caching, no request deduplication. Callers that only want
//! the payload can collapse an envelope with
//! [`ApiResponse::into_result`](cardvault_core::ApiResponse::into_result).
//!
//! # Example
//!
//! ```rust,ignore
//! use cardvault_client::CardVaultClient;
//!
//! let api = CardVaultClient::new("http://localhost:3001")?;
//!
//! let created = api
//!     .create_setup_intent(Some("a@example.test"))
//!     .await?
//!     .into_result()?;
//! let cards = api.payment_methods(&created.customer_id).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use cardvault_core::{
    ApiResponse, CreateSetupIntentRequest, CustomerId, PaymentMethodId, PaymentMethodList,
    PaymentMethodRemoved, PublishableKey, SetupIntentCreated, SetupIntentId, SetupIntentStatus,
};
use thiserror::Error;
use url::Url;

/// Errors raised by the client transport.
///
/// Envelope-level failures (`success: false`) are not errors here; they are
/// returned as-is for the caller to inspect.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed or the body was not a valid envelope.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The base URL could not be parsed.
    #[error("Invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}

/// Client for the CardVault payment API.
#[derive(Debug, Clone)]
pub struct CardVaultClient {
    client: reqwest::Client,
    /// Base URL with no trailing slash, e.g. `http://localhost:3001`.
    base_url: String,
}

impl CardVaultClient {
    /// Create a client for a CardVault server.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        // Parse purely to reject malformed bases early
        let parsed = Url::parse(base_url)?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Create a setup intent, optionally for a customer looked up (or
    /// created) by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or envelope decode fails.
    pub async fn create_setup_intent(
        &self,
        email: Option<&str>,
    ) -> Result<ApiResponse<SetupIntentCreated>, ClientError> {
        let body = CreateSetupIntentRequest {
            customer_id: None,
            customer_email: email.map(str::to_string),
        };

        let response = self
            .client
            .post(self.endpoint("create-payment-intent"))
            .json(&body)
            .send()
            .await?;
        Ok(response.json().await?)
    }

    /// List the card payment methods saved for a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or envelope decode fails.
    pub async fn payment_methods(
        &self,
        customer: &CustomerId,
    ) -> Result<ApiResponse<PaymentMethodList>, ClientError> {
        let response = self
            .client
            .get(self.endpoint(&format!("payment-methods/{customer}")))
            .send()
            .await?;
        Ok(response.json().await?)
    }

    /// Read back the status of a setup intent.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or envelope decode fails.
    pub async fn setup_intent_status(
        &self,
        setup_intent: &SetupIntentId,
    ) -> Result<ApiResponse<SetupIntentStatus>, ClientError> {
        let response = self
            .client
            .get(self.endpoint(&format!("payment-intent/{setup_intent}")))
            .send()
            .await?;
        Ok(response.json().await?)
    }

    /// Detach a saved payment method.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or envelope decode fails.
    pub async fn remove_payment_method(
        &self,
        payment_method: &PaymentMethodId,
    ) -> Result<ApiResponse<PaymentMethodRemoved>, ClientError> {
        let response = self
            .client
            .delete(self.endpoint(&format!("payment-method/{payment_method}")))
            .send()
            .await?;
        Ok(response.json().await?)
    }

    /// Fetch the publishable key a browser frontend needs for Stripe.js.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or envelope decode fails.
    pub async fn publishable_key(&self) -> Result<ApiResponse<PublishableKey>, ClientError> {
        let response = self.client.get(self.endpoint("config")).send().await?;
        Ok(response.json().await?)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/payment/{path}", self.base_url)
    }
}
