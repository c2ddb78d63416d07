//! Stripe REST API client.
//!
//! # Architecture
//!
//! - Requests are form-encoded, responses are JSON, per Stripe's REST API
//! - Stripe is the source of truth - NO local persistence, direct API calls
//! - Responses deserialize into narrow structs that expose only the fields
//!   CardVault reads; the rest of the vendor schema is ignored
//! - Single-attempt semantics: no retry, no backoff, no idempotency keys
//!
//! # Example
//!
//! ```rust,ignore
//! use cardvault_server::stripe::StripeClient;
//!
//! let stripe = StripeClient::new(&config.stripe);
//!
//! // Resolve a customer and open a setup intent for card validation
//! let customer = stripe.create_customer(Some("a@example.test")).await?;
//! let intent = stripe.create_setup_intent(&customer.id).await?;
//! ```

mod client;
mod types;

pub use client::StripeClient;
pub use types::{Customer, SetupIntent};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when interacting with the Stripe API.
#[derive(Debug, Error)]
pub enum StripeError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe rejected the request and returned its error object.
    #[error("{message}")]
    Api {
        /// HTTP status of the response.
        status: u16,
        /// Stripe's human-readable message.
        message: String,
        /// Stripe error type, e.g. `invalid_request_error`.
        error_type: Option<String>,
        /// Stripe error code, e.g. `resource_missing`.
        code: Option<String>,
    },

    /// Response body could not be decoded into the narrow view.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Non-success response whose body was not a Stripe error object.
    #[error("Unexpected response (HTTP {status}): {body}")]
    Unexpected {
        /// HTTP status of the response.
        status: u16,
        /// Leading part of the response body.
        body: String,
    },
}

/// Stripe's error envelope: `{"error": {"message": …, "type": …, "code": …}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_raw_message() {
        let err = StripeError::Api {
            status: 404,
            message: "No such customer: cus_missing".to_string(),
            error_type: Some("invalid_request_error".to_string()),
            code: Some("resource_missing".to_string()),
        };
        assert_eq!(err.to_string(), "No such customer: cus_missing");
    }

    #[test]
    fn test_error_envelope_decodes() {
        let body = r#"{"error":{"message":"No such customer: cus_1","type":"invalid_request_error","code":"resource_missing"}}"#;
        let envelope: ErrorEnvelope =
            serde_json::from_str(body).expect("envelope should decode");
        assert_eq!(
            envelope.error.message.as_deref(),
            Some("No such customer: cus_1")
        );
        assert_eq!(
            envelope.error.error_type.as_deref(),
            Some("invalid_request_error")
        );
        assert_eq!(envelope.error.code.as_deref(), Some("resource_missing"));
    }

    #[test]
    fn test_error_envelope_tolerates_missing_fields() {
        let body = r#"{"error":{"type":"api_error"}}"#;
        let envelope: ErrorEnvelope =
            serde_json::from_str(body).expect("envelope should decode");
        assert!(envelope.error.message.is_none());
        assert!(envelope.error.code.is_none());
    }
}
