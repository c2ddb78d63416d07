//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::stripe::StripeClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the single Stripe client constructed at startup. There
/// is no database pool and no session store: Stripe owns all state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    stripe: StripeClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let stripe = StripeClient::new(&config.stripe);

        Self {
            inner: Arc::new(AppStateInner { config, stripe }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the Stripe API client.
    #[must_use]
    pub fn stripe(&self) -> &StripeClient {
        &self.inner.stripe
    }
}
