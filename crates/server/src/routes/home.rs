//! Demo page route handler.
//!
//! Serves the single page that walks through the three phases: email entry,
//! card entry (confirmed by Stripe.js directly against Stripe), and the
//! saved-card list. All interaction state lives in the page script; the
//! server only injects the publishable key.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::state::AppState;

/// Demo page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    /// Stripe publishable key injected for Stripe.js.
    pub publishable_key: String,
}

/// Render the demo page.
///
/// GET /
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> IndexTemplate {
    IndexTemplate {
        publishable_key: state.config().stripe.publishable_key.clone(),
    }
}
