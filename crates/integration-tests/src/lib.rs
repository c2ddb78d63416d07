//! End-to-end test support for CardVault.
//!
//! # Architecture
//!
//! Tests run the real payment API router against an in-process fake of the
//! Stripe REST API. Both are bound to ephemeral ports:
//!
//! ```text
//! cardvault-client -> cardvault-server router -> FakeStripe (axum)
//! ```
//!
//! [`FakeStripe`] implements the seven Stripe endpoints the server calls,
//! over a mutex-guarded in-memory state. Client-side confirmation (browser
//! to Stripe, never through the backend) is simulated by mutating that
//! state directly via [`FakeStripe::confirm_setup_intent`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Form, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use cardvault_client::CardVaultClient;
use cardvault_core::{CustomerId, PaymentMethodId, SetupIntentId};
use cardvault_server::config::{ServerConfig, StripeConfig};
use cardvault_server::routes;
use cardvault_server::state::AppState;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

// =============================================================================
// Fake Stripe state
// =============================================================================

#[derive(Debug, Clone)]
struct FakeCustomer {
    id: String,
    email: Option<String>,
}

#[derive(Debug, Clone)]
struct FakeSetupIntent {
    id: String,
    client_secret: String,
    status: String,
    customer: String,
    payment_method: Option<String>,
}

#[derive(Debug, Clone)]
struct FakeCard {
    id: String,
    customer: String,
    brand: String,
    last4: String,
    exp_month: u8,
    exp_year: u16,
}

#[derive(Debug, Default)]
struct StripeState {
    counter: u64,
    customers: Vec<FakeCustomer>,
    setup_intents: Vec<FakeSetupIntent>,
    cards: Vec<FakeCard>,
    /// Number of `GET /v1/payment_methods` calls, to assert validation
    /// failures never reach the adapter.
    payment_method_list_calls: u64,
}

impl StripeState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{prefix}_{:04}", self.counter)
    }
}

/// In-process fake of the Stripe REST API.
#[derive(Debug, Clone, Default)]
pub struct FakeStripe {
    state: Arc<Mutex<StripeState>>,
}

impl FakeStripe {
    fn lock(&self) -> MutexGuard<'_, StripeState> {
        self.state.lock().expect("fake stripe state lock poisoned")
    }

    /// Bind the fake to an ephemeral port and serve it in the background.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn(&self) -> SocketAddr {
        let router = Router::new()
            .route("/v1/customers", post(create_customer).get(list_customers))
            .route("/v1/customers/{id}", get(retrieve_customer))
            .route("/v1/setup_intents", post(create_setup_intent))
            .route("/v1/setup_intents/{id}", get(retrieve_setup_intent))
            .route("/v1/payment_methods", get(list_payment_methods))
            .route("/v1/payment_methods/{id}/detach", post(detach_payment_method))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind fake stripe listener");
        let addr = listener.local_addr().expect("listener has no local addr");

        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        addr
    }

    // =========================================================================
    // State inspection and seeding
    // =========================================================================

    /// Number of customers created so far.
    #[must_use]
    pub fn customer_count(&self) -> usize {
        self.lock().customers.len()
    }

    /// Number of setup intents created so far.
    #[must_use]
    pub fn setup_intent_count(&self) -> usize {
        self.lock().setup_intents.len()
    }

    /// Number of payment-method list calls the fake has served.
    #[must_use]
    pub fn payment_method_list_calls(&self) -> u64 {
        self.lock().payment_method_list_calls
    }

    /// Email of a customer, if it exists and has one.
    #[must_use]
    pub fn customer_email(&self, customer: &CustomerId) -> Option<String> {
        self.lock()
            .customers
            .iter()
            .find(|c| c.id == customer.as_str())
            .and_then(|c| c.email.clone())
    }

    /// Seed an existing customer, as if created in an earlier session.
    #[must_use]
    pub fn seed_customer(&self, email: Option<&str>) -> CustomerId {
        let mut state = self.lock();
        let id = state.next_id("cus");
        state.customers.push(FakeCustomer {
            id: id.clone(),
            email: email.map(str::to_string),
        });
        CustomerId::new(id)
    }

    /// Attach a card to a customer, bypassing any setup intent.
    #[must_use]
    pub fn seed_card(&self, customer: &CustomerId, brand: &str, last4: &str) -> PaymentMethodId {
        let mut state = self.lock();
        let id = state.next_id("pm");
        state.cards.push(FakeCard {
            id: id.clone(),
            customer: customer.as_str().to_string(),
            brand: brand.to_string(),
            last4: last4.to_string(),
            exp_month: 12,
            exp_year: 2030,
        });
        PaymentMethodId::new(id)
    }

    /// Simulate a successful client-side confirmation: the browser hands the
    /// card to Stripe, which attaches a payment method and marks the intent
    /// succeeded. The backend is not involved in this transition.
    #[must_use]
    pub fn confirm_setup_intent(
        &self,
        setup_intent: &SetupIntentId,
        brand: &str,
        last4: &str,
    ) -> PaymentMethodId {
        let mut state = self.lock();

        let pm_id = state.next_id("pm");
        let intent = state
            .setup_intents
            .iter_mut()
            .find(|i| i.id == setup_intent.as_str())
            .expect("confirming unknown setup intent");
        intent.status = "succeeded".to_string();
        intent.payment_method = Some(pm_id.clone());
        let customer = intent.customer.clone();

        state.cards.push(FakeCard {
            id: pm_id.clone(),
            customer,
            brand: brand.to_string(),
            last4: last4.to_string(),
            exp_month: 12,
            exp_year: 2030,
        });

        PaymentMethodId::new(pm_id)
    }
}

// =============================================================================
// Fake Stripe handlers
// =============================================================================

/// Stripe-shaped error response: `{"error": {…}}` with the given status.
fn stripe_error(status: StatusCode, message: &str, code: &str) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "message": message,
                "type": "invalid_request_error",
                "code": code,
            }
        })),
    )
        .into_response()
}

fn customer_json(customer: &FakeCustomer) -> Value {
    json!({
        "id": &customer.id,
        "object": "customer",
        "email": &customer.email,
        "livemode": false,
    })
}

fn setup_intent_json(intent: &FakeSetupIntent) -> Value {
    json!({
        "id": &intent.id,
        "object": "setup_intent",
        "status": &intent.status,
        "client_secret": &intent.client_secret,
        "customer": &intent.customer,
        "payment_method": &intent.payment_method,
        "usage": "off_session",
    })
}

fn card_json(card: &FakeCard) -> Value {
    json!({
        "id": &card.id,
        "object": "payment_method",
        "type": "card",
        "customer": &card.customer,
        "card": {
            "brand": &card.brand,
            "last4": &card.last4,
            "exp_month": card.exp_month,
            "exp_year": card.exp_year,
            "funding": "credit",
        },
    })
}

#[derive(Debug, Deserialize)]
struct CreateCustomerForm {
    email: Option<String>,
}

async fn create_customer(
    State(fake): State<FakeStripe>,
    Form(form): Form<CreateCustomerForm>,
) -> Json<Value> {
    let mut state = fake.lock();
    let id = state.next_id("cus");
    let customer = FakeCustomer {
        id,
        email: form.email,
    };
    state.customers.push(customer.clone());
    Json(customer_json(&customer))
}

#[derive(Debug, Deserialize)]
struct ListCustomersQuery {
    email: Option<String>,
    limit: Option<usize>,
}

async fn list_customers(
    State(fake): State<FakeStripe>,
    Query(query): Query<ListCustomersQuery>,
) -> Json<Value> {
    let state = fake.lock();
    let matches: Vec<Value> = state
        .customers
        .iter()
        .rev() // Stripe lists most recently created first
        .filter(|c| query.email.is_none() || c.email == query.email)
        .take(query.limit.unwrap_or(10))
        .map(customer_json)
        .collect();
    Json(json!({"object": "list", "data": matches, "has_more": false}))
}

async fn retrieve_customer(
    State(fake): State<FakeStripe>,
    Path(id): Path<String>,
) -> Response {
    let state = fake.lock();
    state.customers.iter().find(|c| c.id == id).map_or_else(
        || {
            stripe_error(
                StatusCode::NOT_FOUND,
                &format!("No such customer: '{id}'"),
                "resource_missing",
            )
        },
        |customer| Json(customer_json(customer)).into_response(),
    )
}

#[derive(Debug, Deserialize)]
struct CreateSetupIntentForm {
    customer: String,
}

async fn create_setup_intent(
    State(fake): State<FakeStripe>,
    Form(form): Form<CreateSetupIntentForm>,
) -> Response {
    let mut state = fake.lock();
    if !state.customers.iter().any(|c| c.id == form.customer) {
        return stripe_error(
            StatusCode::BAD_REQUEST,
            &format!("No such customer: '{}'", form.customer),
            "resource_missing",
        );
    }

    let id = state.next_id("seti");
    let intent = FakeSetupIntent {
        client_secret: format!("{id}_secret_test"),
        id,
        status: "requires_payment_method".to_string(),
        customer: form.customer,
        payment_method: None,
    };
    state.setup_intents.push(intent.clone());
    Json(setup_intent_json(&intent)).into_response()
}

async fn retrieve_setup_intent(
    State(fake): State<FakeStripe>,
    Path(id): Path<String>,
) -> Response {
    let state = fake.lock();
    state.setup_intents.iter().find(|i| i.id == id).map_or_else(
        || {
            stripe_error(
                StatusCode::NOT_FOUND,
                &format!("No such setupintent: '{id}'"),
                "resource_missing",
            )
        },
        |intent| Json(setup_intent_json(intent)).into_response(),
    )
}

#[derive(Debug, Deserialize)]
struct ListPaymentMethodsQuery {
    customer: String,
    #[serde(rename = "type")]
    method_type: String,
}

async fn list_payment_methods(
    State(fake): State<FakeStripe>,
    Query(query): Query<ListPaymentMethodsQuery>,
) -> Json<Value> {
    let mut state = fake.lock();
    state.payment_method_list_calls += 1;

    let matches: Vec<Value> = state
        .cards
        .iter()
        .filter(|card| card.customer == query.customer && query.method_type == "card")
        .map(card_json)
        .collect();
    Json(json!({"object": "list", "data": matches, "has_more": false}))
}

async fn detach_payment_method(
    State(fake): State<FakeStripe>,
    Path(id): Path<String>,
) -> Response {
    let mut state = fake.lock();
    let Some(index) = state.cards.iter().position(|card| card.id == id) else {
        return stripe_error(
            StatusCode::NOT_FOUND,
            &format!("No such payment method: '{id}'"),
            "resource_missing",
        );
    };

    let card = state.cards.remove(index);
    Json(card_json(&card)).into_response()
}

// =============================================================================
// Test context
// =============================================================================

/// A running CardVault server wired to a fake Stripe, plus a typed client.
pub struct TestContext {
    /// Typed client pointed at the running server.
    pub api: CardVaultClient,
    /// Base URL of the running server, for raw requests.
    pub base_url: String,
    /// Handle to the fake Stripe state.
    pub stripe: FakeStripe,
}

impl TestContext {
    /// Spawn a fake Stripe and a CardVault server wired to it.
    ///
    /// # Panics
    ///
    /// Panics if either server fails to bind.
    pub async fn new() -> Self {
        let stripe = FakeStripe::default();
        let stripe_addr = stripe.spawn().await;

        let config = ServerConfig {
            host: "127.0.0.1".parse().expect("valid host"),
            port: 0,
            stripe: StripeConfig {
                api_base: Url::parse(&format!("http://{stripe_addr}")).expect("valid fake url"),
                api_version: "2024-06-20".to_string(),
                secret_key: SecretString::from("sk_test_4eC39HqLyjWDarjtT1zdp7dc"),
                publishable_key: "pk_test_TYooMQauvdEDq54NiTphI7jx".to_string(),
            },
            sentry_dsn: None,
        };

        let app = routes::app(AppState::new(config));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind server listener");
        let addr = listener.local_addr().expect("listener has no local addr");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let base_url = format!("http://{addr}");
        let api = CardVaultClient::new(&base_url).expect("valid base url");

        Self {
            api,
            base_url,
            stripe,
        }
    }
}
