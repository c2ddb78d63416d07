//! End-to-end tests for the payment API.
//!
//! Each test spawns its own CardVault server wired to its own fake Stripe,
//! so tests are independent and need no external services.

use cardvault_integration_tests::TestContext;
use reqwest::StatusCode;
use serde_json::{Value, json};

// ============================================================================
// Customer resolution
// ============================================================================

#[tokio::test]
async fn fresh_email_creates_one_customer_and_one_setup_intent() {
    let ctx = TestContext::new().await;

    let created = ctx
        .api
        .create_setup_intent(Some("a@example.test"))
        .await
        .expect("request failed")
        .into_result()
        .expect("expected success envelope");

    assert_eq!(ctx.stripe.customer_count(), 1);
    assert_eq!(ctx.stripe.setup_intent_count(), 1);
    assert_eq!(
        ctx.stripe.customer_email(&created.customer_id).as_deref(),
        Some("a@example.test")
    );
    assert!(!created.client_secret.is_empty());
}

#[tokio::test]
async fn repeat_email_reuses_existing_customer() {
    let ctx = TestContext::new().await;

    let first = ctx
        .api
        .create_setup_intent(Some("repeat@example.test"))
        .await
        .expect("request failed")
        .into_result()
        .expect("expected success envelope");

    let second = ctx
        .api
        .create_setup_intent(Some("repeat@example.test"))
        .await
        .expect("request failed")
        .into_result()
        .expect("expected success envelope");

    // No duplicate customer, but a fresh setup intent each time
    assert_eq!(ctx.stripe.customer_count(), 1);
    assert_eq!(ctx.stripe.setup_intent_count(), 2);
    assert_eq!(first.customer_id, second.customer_id);
    assert_ne!(first.setup_intent_id, second.setup_intent_id);
}

#[tokio::test]
async fn no_id_and_no_email_creates_anonymous_customer() {
    let ctx = TestContext::new().await;

    let created = ctx
        .api
        .create_setup_intent(None)
        .await
        .expect("request failed")
        .into_result()
        .expect("expected success envelope");

    assert_eq!(ctx.stripe.customer_count(), 1);
    assert_eq!(ctx.stripe.customer_email(&created.customer_id), None);
}

#[tokio::test]
async fn explicit_customer_id_takes_precedence_over_email() {
    let ctx = TestContext::new().await;
    let existing = ctx.stripe.seed_customer(Some("owner@example.test"));

    // Raw request so both fields can be supplied
    let envelope: Value = reqwest::Client::new()
        .post(format!("{}/api/payment/create-payment-intent", ctx.base_url))
        .json(&json!({
            "customerId": existing.as_str(),
            "customerEmail": "other@example.test",
        }))
        .send()
        .await
        .expect("request failed")
        .json()
        .await
        .expect("invalid envelope");

    assert_eq!(envelope["success"], json!(true));
    assert_eq!(envelope["data"]["customerId"], json!(existing.as_str()));
    // The email path was never taken, so no customer was created
    assert_eq!(ctx.stripe.customer_count(), 1);
}

#[tokio::test]
async fn unknown_customer_id_surfaces_upstream_error_as_500() {
    let ctx = TestContext::new().await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/payment/create-payment-intent", ctx.base_url))
        .json(&json!({"customerId": "cus_missing"}))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let envelope: Value = response.json().await.expect("invalid envelope");
    assert_eq!(envelope["success"], json!(false));
    assert_eq!(
        envelope["error"],
        json!("No such customer: 'cus_missing'")
    );
    // No setup intent was opened after the failed resolution
    assert_eq!(ctx.stripe.setup_intent_count(), 0);
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn blank_customer_id_is_rejected_before_reaching_stripe() {
    let ctx = TestContext::new().await;

    let response = reqwest::Client::new()
        .get(format!("{}/api/payment/payment-methods/%20", ctx.base_url))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let envelope: Value = response.json().await.expect("invalid envelope");
    assert_eq!(envelope["success"], json!(false));
    assert_eq!(envelope["error"], json!("Customer ID is required"));
    assert_eq!(ctx.stripe.payment_method_list_calls(), 0);
}

#[tokio::test]
async fn blank_payment_intent_id_is_rejected() {
    let ctx = TestContext::new().await;

    let response = reqwest::Client::new()
        .get(format!("{}/api/payment/payment-intent/%20", ctx.base_url))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let envelope: Value = response.json().await.expect("invalid envelope");
    assert_eq!(envelope["error"], json!("Payment Intent ID is required"));
}

#[tokio::test]
async fn blank_payment_method_id_is_rejected() {
    let ctx = TestContext::new().await;

    let response = reqwest::Client::new()
        .delete(format!("{}/api/payment/payment-method/%20", ctx.base_url))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let envelope: Value = response.json().await.expect("invalid envelope");
    assert_eq!(envelope["error"], json!("Payment Method ID is required"));
}

// ============================================================================
// Saved cards
// ============================================================================

#[tokio::test]
async fn listing_returns_seeded_cards() {
    let ctx = TestContext::new().await;
    let customer = ctx.stripe.seed_customer(Some("cards@example.test"));
    let _pm = ctx.stripe.seed_card(&customer, "mastercard", "4444");

    let list = ctx
        .api
        .payment_methods(&customer)
        .await
        .expect("request failed")
        .into_result()
        .expect("expected success envelope");

    assert_eq!(list.payment_methods.len(), 1);
    let method = &list.payment_methods[0];
    assert_eq!(method.card.brand, "mastercard");
    assert_eq!(method.card.last4, "4444");
}

#[tokio::test]
async fn listing_for_customer_without_cards_is_empty() {
    let ctx = TestContext::new().await;
    let customer = ctx.stripe.seed_customer(None);

    let list = ctx
        .api
        .payment_methods(&customer)
        .await
        .expect("request failed")
        .into_result()
        .expect("expected success envelope");

    assert!(list.payment_methods.is_empty());
}

#[tokio::test]
async fn removing_a_card_detaches_it_upstream() {
    let ctx = TestContext::new().await;
    let customer = ctx.stripe.seed_customer(Some("remove@example.test"));
    let pm = ctx.stripe.seed_card(&customer, "visa", "4242");

    let removed = ctx
        .api
        .remove_payment_method(&pm)
        .await
        .expect("request failed")
        .into_result()
        .expect("expected success envelope");

    assert_eq!(removed.payment_method_id, pm);
    assert_eq!(removed.message, "Payment method removed successfully");

    // The card is gone from the subsequent list
    let list = ctx
        .api
        .payment_methods(&customer)
        .await
        .expect("request failed")
        .into_result()
        .expect("expected success envelope");
    assert!(list.payment_methods.is_empty());
}

#[tokio::test]
async fn removing_unknown_card_returns_500_with_stripe_message() {
    let ctx = TestContext::new().await;

    let response = reqwest::Client::new()
        .delete(format!(
            "{}/api/payment/payment-method/pm_gone",
            ctx.base_url
        ))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let envelope: Value = response.json().await.expect("invalid envelope");
    assert_eq!(envelope["success"], json!(false));
    assert_eq!(envelope["error"], json!("No such payment method: 'pm_gone'"));
}

#[tokio::test]
async fn removing_same_card_twice_fails_the_second_time() {
    let ctx = TestContext::new().await;
    let customer = ctx.stripe.seed_customer(None);
    let pm = ctx.stripe.seed_card(&customer, "visa", "4242");

    let first = ctx
        .api
        .remove_payment_method(&pm)
        .await
        .expect("request failed");
    assert!(first.success);

    // Detachment is not special-cased as idempotent
    let second = ctx
        .api
        .remove_payment_method(&pm)
        .await
        .expect("request failed");
    assert!(!second.success);
    assert!(
        second
            .error
            .as_deref()
            .is_some_and(|e| e.contains("No such payment method"))
    );
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[tokio::test]
async fn confirmed_card_shows_up_in_the_saved_list() {
    let ctx = TestContext::new().await;

    // Email entry: backend opens a setup intent
    let created = ctx
        .api
        .create_setup_intent(Some("a@example.test"))
        .await
        .expect("request failed")
        .into_result()
        .expect("expected success envelope");

    // Card entry with 4242424242424242 succeeds; the browser confirms
    // directly with Stripe, so only the fake's state changes
    let pm = ctx
        .stripe
        .confirm_setup_intent(&created.setup_intent_id, "visa", "4242");

    let status = ctx
        .api
        .setup_intent_status(&created.setup_intent_id)
        .await
        .expect("request failed")
        .into_result()
        .expect("expected success envelope");
    assert_eq!(status.status, "succeeded");
    assert_eq!(status.payment_method, Some(pm));
    assert_eq!(status.customer, Some(created.customer_id.clone()));

    let list = ctx
        .api
        .payment_methods(&created.customer_id)
        .await
        .expect("request failed")
        .into_result()
        .expect("expected success envelope");
    assert_eq!(list.payment_methods.len(), 1);
    assert_eq!(list.payment_methods[0].card.brand, "visa");
    assert_eq!(list.payment_methods[0].card.last4, "4242");
}

#[tokio::test]
async fn declined_confirmation_leaves_backend_state_unchanged() {
    let ctx = TestContext::new().await;

    let created = ctx
        .api
        .create_setup_intent(Some("declined@example.test"))
        .await
        .expect("request failed")
        .into_result()
        .expect("expected success envelope");

    // Card 4000000000000002 is declined by Stripe during client-side
    // confirmation; the backend is never informed, so nothing changes here

    let status = ctx
        .api
        .setup_intent_status(&created.setup_intent_id)
        .await
        .expect("request failed")
        .into_result()
        .expect("expected success envelope");
    assert_eq!(status.status, "requires_payment_method");
    assert_eq!(status.payment_method, None);

    let list = ctx
        .api
        .payment_methods(&created.customer_id)
        .await
        .expect("request failed")
        .into_result()
        .expect("expected success envelope");
    assert!(list.payment_methods.is_empty());
}

#[tokio::test]
async fn unknown_setup_intent_surfaces_upstream_error() {
    let ctx = TestContext::new().await;

    let response = reqwest::Client::new()
        .get(format!(
            "{}/api/payment/payment-intent/seti_missing",
            ctx.base_url
        ))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let envelope: Value = response.json().await.expect("invalid envelope");
    assert_eq!(envelope["success"], json!(false));
}

// ============================================================================
// Plumbing
// ============================================================================

#[tokio::test]
async fn health_endpoint_responds() {
    let ctx = TestContext::new().await;

    let response = reqwest::Client::new()
        .get(format!("{}/health", ctx.base_url))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.expect("no body"), "ok");
}

#[tokio::test]
async fn config_endpoint_hands_out_publishable_key() {
    let ctx = TestContext::new().await;

    let config = ctx
        .api
        .publishable_key()
        .await
        .expect("request failed")
        .into_result()
        .expect("expected success envelope");

    assert_eq!(config.publishable_key, "pk_test_TYooMQauvdEDq54NiTphI7jx");
}
