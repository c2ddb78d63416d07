//! HTTP route handlers for the payment API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Demo page (email form, card entry, saved cards)
//! GET  /health                  - Health check
//!
//! # Payment API (JSON envelope)
//! POST   /api/payment/create-payment-intent           - Create a setup intent
//! GET    /api/payment/payment-methods/{customerId}    - List saved cards
//! GET    /api/payment/payment-intent/{paymentIntentId} - Setup intent status
//! DELETE /api/payment/payment-method/{paymentMethodId} - Detach a card
//! GET    /api/payment/config                          - Publishable key for Stripe.js
//! ```

pub mod home;
pub mod payment;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the payment API routes router.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/create-payment-intent", post(payment::create_setup_intent))
        .route(
            "/payment-methods/{customerId}",
            get(payment::list_payment_methods),
        )
        .route(
            "/payment-intent/{paymentIntentId}",
            get(payment::setup_intent_status),
        )
        .route(
            "/payment-method/{paymentMethodId}",
            delete(payment::remove_payment_method),
        )
        .route("/config", get(payment::publishable_key))
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Demo page
        .route("/", get(home::home))
        // Payment API; CORS is open so a separately-hosted frontend can call it
        .nest("/api/payment", payment_routes().layer(CorsLayer::permissive()))
}

/// Build the full application router with state and tracing applied.
///
/// Used by both `main` and the integration tests so they exercise the same
/// router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. There are no local dependencies to
/// verify; Stripe reachability is observed per-request.
async fn health() -> &'static str {
    "ok"
}
