//! The uniform response envelope of the payment API.
//!
//! Every endpoint responds with `{success, data?, error?}`. Success carries
//! `data` and omits `error`; failure carries `error` and omits `data`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error string carried by a failure envelope.
///
/// The server forwards whatever message the upstream processor produced, so
/// there is no richer structure to decode here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ApiError(pub String);

/// The uniform response envelope used by every payment API endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Payload, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable error message, present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Build a success envelope around a payload.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Build a failure envelope around an error message.
    #[must_use]
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Collapse the envelope into a `Result`.
    ///
    /// A success envelope without `data` and a failure envelope without
    /// `error` are both treated as failures, since neither is a shape the
    /// server produces.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` with the envelope's message (or a fallback when
    /// the envelope is malformed).
    pub fn into_result(self) -> Result<T, ApiError> {
        if self.success {
            self.data
                .ok_or_else(|| ApiError("missing data in success response".to_string()))
        } else {
            Err(ApiError(
                self.error
                    .unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let resp = ApiResponse::ok(42);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 42}));
    }

    #[test]
    fn test_failure_envelope_shape() {
        let resp = ApiResponse::<()>::err("boom");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "boom"}));
    }

    #[test]
    fn test_into_result_success() {
        let resp = ApiResponse::ok("value".to_string());
        assert_eq!(resp.into_result().unwrap(), "value");
    }

    #[test]
    fn test_into_result_failure() {
        let resp = ApiResponse::<String>::err("upstream failed");
        let err = resp.into_result().unwrap_err();
        assert_eq!(err.to_string(), "upstream failed");
    }

    #[test]
    fn test_into_result_malformed_success() {
        let resp = ApiResponse::<String> {
            success: true,
            data: None,
            error: None,
        };
        assert!(resp.into_result().is_err());
    }
}
