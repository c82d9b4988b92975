//! End-to-end tests of the checkout server against a scripted processor.

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use pay_adyen::NotificationHandler;
use pay_api::{create_router, AppConfig, AppState, DropinConfig};
use pay_core::{
    CheckoutProfile, ContinuationData, ContinuationStore, DetailsRequest, InMemoryContinuationStore,
    NotificationRequestItem, OrderRef, PaymentError, PaymentMethodsRequest, PaymentProcessor,
    PaymentRequest, PaymentResponse, PaymentResult, SessionRequest, SessionResponse,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Processor double: answers from a script and records every call
struct MockProcessor {
    payment_response: Value,
    payment_error: Option<(u16, &'static str)>,
    /// Result code answered when `paymentData` matches `expected_payment_data`
    details_result: &'static str,
    expected_payment_data: &'static str,
    /// Number of upcoming `submit_details` calls that fail before reaching Adyen
    details_network_failures: Mutex<u32>,
    payments: Mutex<Vec<PaymentRequest>>,
    sessions: Mutex<Vec<SessionRequest>>,
    details: Mutex<Vec<DetailsRequest>>,
}

impl MockProcessor {
    fn answering(details_result: &'static str) -> Self {
        Self {
            payment_response: json!({
                "resultCode": "RedirectShopper",
                "action": {"type": "redirect", "paymentData": "cont-123", "url": "https://issuer.test/3ds"}
            }),
            payment_error: None,
            details_result,
            expected_payment_data: "cont-123",
            details_network_failures: Mutex::new(0),
            payments: Mutex::new(Vec::new()),
            sessions: Mutex::new(Vec::new()),
            details: Mutex::new(Vec::new()),
        }
    }

    fn details_calls(&self) -> usize {
        self.details.lock().unwrap().len()
    }

    fn last_payment_ref(&self) -> OrderRef {
        self.payments.lock().unwrap().last().unwrap().reference.clone()
    }
}

#[async_trait]
impl PaymentProcessor for MockProcessor {
    async fn create_session(&self, request: &SessionRequest) -> PaymentResult<SessionResponse> {
        self.sessions.lock().unwrap().push(request.clone());
        Ok(serde_json::from_value(json!({"id": "CS123", "sessionData": "opaque"})).unwrap())
    }

    async fn payment_methods(&self, request: &PaymentMethodsRequest) -> PaymentResult<Value> {
        Ok(json!({
            "paymentMethods": [{"name": "Cards", "type": "scheme"}],
            "shopperReference": request.shopper_reference,
        }))
    }

    async fn submit_payment(&self, request: &PaymentRequest) -> PaymentResult<PaymentResponse> {
        self.payments.lock().unwrap().push(request.clone());
        if let Some((status, message)) = self.payment_error {
            return Err(PaymentError::ProviderError {
                provider: "mock".to_string(),
                status,
                message: message.to_string(),
                error_code: Some("174".to_string()),
            });
        }
        Ok(serde_json::from_value(self.payment_response.clone()).unwrap())
    }

    async fn submit_details(&self, request: &DetailsRequest) -> PaymentResult<PaymentResponse> {
        self.details.lock().unwrap().push(request.clone());
        {
            let mut failures = self.details_network_failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(PaymentError::NetworkError("connection reset".to_string()));
            }
        }
        let matches = request.payment_data.as_ref().map(|d| d.as_str()) == Some(self.expected_payment_data);
        if matches {
            Ok(PaymentResponse::with_result(self.details_result))
        } else {
            Ok(PaymentResponse::with_result("Error"))
        }
    }

    fn validate_hmac(&self, item: &NotificationRequestItem) -> bool {
        item.hmac_signature() == Some("valid")
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

#[derive(Default)]
struct RecordingHandler {
    seen: Mutex<Vec<String>>,
    fail: bool,
}

impl NotificationHandler for RecordingHandler {
    fn on_authorisation(&self, item: &NotificationRequestItem) -> PaymentResult<()> {
        if self.fail {
            return Err(PaymentError::Internal("order store offline".to_string()));
        }
        self.seen.lock().unwrap().push(item.merchant_reference.clone());
        Ok(())
    }

    fn on_other(&self, item: &NotificationRequestItem) -> PaymentResult<()> {
        self.seen.lock().unwrap().push(item.merchant_reference.clone());
        Ok(())
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 8080,
        base_url: Some("http://shop.test".to_string()),
        environment: "test".to_string(),
        shopper_reference: None,
        shopper_email: None,
        public_dir: PathBuf::from("public"),
        continuation_ttl: Duration::from_secs(3600),
        purge_interval: Duration::from_secs(300),
    }
}

struct Harness {
    server: TestServer,
    processor: Arc<MockProcessor>,
    store: InMemoryContinuationStore,
    handler: Arc<RecordingHandler>,
}

fn harness_with(processor: MockProcessor, handler: RecordingHandler) -> Harness {
    let processor = Arc::new(processor);
    let handler = Arc::new(handler);
    let store = InMemoryContinuationStore::new();

    let state = AppState::with_processor(
        test_config(),
        CheckoutProfile::default().with_shopper_reference("shopper-1"),
        DropinConfig {
            client_key: "test_CLIENTKEY".to_string(),
            environment: "test",
        },
        processor.clone(),
        Arc::new(store.clone()) as Arc<dyn ContinuationStore>,
    )
    .with_notification_handler(handler.clone());

    let server = TestServer::new(create_router(state)).unwrap();
    Harness {
        server,
        processor,
        store,
        handler,
    }
}

fn harness(details_result: &'static str) -> Harness {
    harness_with(MockProcessor::answering(details_result), RecordingHandler::default())
}

fn location(response: &axum_test::TestResponse) -> String {
    response.header("location").to_str().unwrap().to_string()
}

async fn initiate(h: &Harness) -> OrderRef {
    let response = h
        .server
        .post("/api/initiatePayment")
        .json(&json!({
            "paymentMethod": {"type": "scheme", "encryptedCardNumber": "enc"},
            "browserInfo": {"userAgent": "test"}
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["action"]["paymentData"], "cont-123");
    h.processor.last_payment_ref()
}

// ============================================================================
// Redirect correlation
// ============================================================================

#[tokio::test]
async fn test_redirect_return_authorised_goes_to_success() {
    let h = harness("Authorised");
    let order_ref = initiate(&h).await;

    let payment = h.processor.payments.lock().unwrap()[0].clone();
    assert_eq!(
        payment.return_url,
        format!("http://shop.test/api/handleShopperRedirect?orderRef={}", order_ref)
    );
    assert_eq!(h.store.fetch(&order_ref).await.unwrap(), Some(ContinuationData::from("cont-123")));

    let response = h
        .server
        .get(&format!("/api/handleShopperRedirect?orderRef={}&redirectResult=abc", order_ref))
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/result/success");

    let details = h.processor.details.lock().unwrap()[0].clone();
    assert_eq!(details.details, json!({"redirectResult": "abc"}));
    assert_eq!(details.payment_data, Some(ContinuationData::from("cont-123")));
}

#[tokio::test]
async fn test_redirect_return_refused_goes_to_failed() {
    let h = harness("Refused");
    let order_ref = initiate(&h).await;

    let response = h
        .server
        .get(&format!("/api/handleShopperRedirect?orderRef={}&redirectResult=abc", order_ref))
        .await;

    assert_eq!(location(&response), "/result/failed");
}

#[tokio::test]
async fn test_redirect_return_pending_goes_to_pending() {
    let h = harness("Received");
    let order_ref = initiate(&h).await;

    let response = h
        .server
        .get(&format!("/api/handleShopperRedirect?orderRef={}&redirectResult=abc", order_ref))
        .await;

    assert_eq!(location(&response), "/result/pending");
}

#[tokio::test]
async fn test_redirect_return_for_seeded_reference() {
    let h = harness("Authorised");
    h.store
        .store(&OrderRef::from("order-1"), ContinuationData::from("cont-123"))
        .await
        .unwrap();

    let response = h
        .server
        .get("/api/handleShopperRedirect?orderRef=order-1&redirectResult=abc")
        .await;

    assert_eq!(location(&response), "/result/success");
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_unknown_reference_never_reaches_processor() {
    let h = harness("Authorised");

    let response = h
        .server
        .get("/api/handleShopperRedirect?orderRef=never-stored&redirectResult=abc")
        .await;

    assert_eq!(location(&response), "/result/error");
    assert_eq!(h.processor.details_calls(), 0);
}

#[tokio::test]
async fn test_missing_reference_goes_to_error() {
    let h = harness("Authorised");

    let response = h.server.get("/api/handleShopperRedirect?redirectResult=abc").await;

    assert_eq!(location(&response), "/result/error");
    assert_eq!(h.processor.details_calls(), 0);
}

#[tokio::test]
async fn test_second_return_for_consumed_reference_fails() {
    let h = harness("Authorised");
    let order_ref = initiate(&h).await;
    let path = format!("/api/handleShopperRedirect?orderRef={}&redirectResult=abc", order_ref);

    let first = h.server.get(&path).await;
    assert_eq!(location(&first), "/result/success");

    let second = h.server.get(&path).await;
    assert_eq!(location(&second), "/result/error");
    assert_eq!(h.processor.details_calls(), 1);
}

#[tokio::test]
async fn test_post_redirect_with_legacy_3ds_fields() {
    let h = harness("Authorised");
    let order_ref = initiate(&h).await;

    let response = h
        .server
        .post(&format!("/api/handleShopperRedirect?orderRef={}", order_ref))
        .form(&[("MD", "merchant-data"), ("PaRes", "auth-response")])
        .await;

    assert_eq!(location(&response), "/result/success");
    let details = h.processor.details.lock().unwrap()[0].clone();
    assert_eq!(details.details, json!({"MD": "merchant-data", "PaRes": "auth-response"}));
}

#[tokio::test]
async fn test_post_redirect_without_form_body_goes_to_error() {
    let h = harness("Authorised");
    let order_ref = initiate(&h).await;

    let response = h
        .server
        .post(&format!("/api/handleShopperRedirect?orderRef={}", order_ref))
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/result/error");
    assert_eq!(h.processor.details_calls(), 0);
    assert_eq!(h.store.fetch(&order_ref).await.unwrap(), Some(ContinuationData::from("cont-123")));
}

#[tokio::test]
async fn test_redirect_with_duplicate_parameter_goes_to_error() {
    let h = harness("Authorised");
    let order_ref = initiate(&h).await;

    let response = h
        .server
        .get(&format!(
            "/api/handleShopperRedirect?orderRef={}&redirectResult=a&redirectResult=b",
            order_ref
        ))
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/result/error");
    assert_eq!(h.processor.details_calls(), 0);
}

#[tokio::test]
async fn test_redirect_return_retries_after_network_failure() {
    let processor = MockProcessor::answering("Authorised");
    *processor.details_network_failures.lock().unwrap() = 1;
    let h = harness_with(processor, RecordingHandler::default());
    let order_ref = initiate(&h).await;
    let path = format!("/api/handleShopperRedirect?orderRef={}&redirectResult=abc", order_ref);

    let first = h.server.get(&path).await;
    assert_eq!(location(&first), "/result/error");
    assert_eq!(h.store.fetch(&order_ref).await.unwrap(), Some(ContinuationData::from("cont-123")));

    let second = h.server.get(&path).await;
    assert_eq!(location(&second), "/result/success");
    assert_eq!(h.processor.details_calls(), 2);
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_processor_rejection_still_consumes_reference() {
    let h = harness("Refused");
    let order_ref = initiate(&h).await;
    let path = format!("/api/handleShopperRedirect?orderRef={}&redirectResult=abc", order_ref);

    assert_eq!(location(&h.server.get(&path).await), "/result/failed");
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_payment_without_action_stores_nothing() {
    let mut processor = MockProcessor::answering("Authorised");
    processor.payment_response = json!({"resultCode": "Authorised", "pspReference": "8815"});
    let h = harness_with(processor, RecordingHandler::default());

    let response = h
        .server
        .post("/api/initiatePayment")
        .json(&json!({"paymentMethod": {"type": "scheme"}}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["resultCode"], "Authorised");
    assert!(h.store.is_empty().await);
}

// ============================================================================
// JSON relays
// ============================================================================

#[tokio::test]
async fn test_processor_error_status_is_relayed() {
    let mut processor = MockProcessor::answering("Authorised");
    processor.payment_error = Some((422, "Unable to decrypt data"));
    let h = harness_with(processor, RecordingHandler::default());

    let response = h
        .server
        .post("/api/initiatePayment")
        .json(&json!({"paymentMethod": {"type": "scheme"}}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], 422);
    assert!(body["error"].as_str().unwrap().contains("Unable to decrypt data"));
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_sessions_use_checkout_return_url() {
    let h = harness("Authorised");

    let response = h.server.post("/api/sessions").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], "CS123");

    let session = h.processor.sessions.lock().unwrap()[0].clone();
    assert_eq!(
        session.return_url,
        format!("http://shop.test/checkout?orderRef={}", session.reference)
    );
}

#[tokio::test]
async fn test_payment_methods_relayed() {
    let h = harness("Authorised");

    let response = h.server.post("/api/getPaymentMethods").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["paymentMethods"][0]["type"], "scheme");
    assert_eq!(body["shopperReference"], "shopper-1");
}

#[tokio::test]
async fn test_submit_additional_details_relay() {
    let h = harness("Authorised");

    let response = h
        .server
        .post("/api/submitAdditionalDetails")
        .json(&json!({"details": {"threeDSResult": "xyz"}, "paymentData": "cont-123"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["resultCode"], "Authorised");
}

// ============================================================================
// Notifications
// ============================================================================

fn notification(reference: &str, signature: &str) -> Value {
    notification_item(reference, signature, "AUD", "AUTHORISATION")
}

fn notification_item(reference: &str, signature: &str, currency: &str, event_code: &str) -> Value {
    json!({
        "NotificationRequestItem": {
            "additionalData": {"hmacSignature": signature},
            "amount": {"currency": currency, "value": 10000},
            "eventCode": event_code,
            "merchantAccountCode": "TestMerchant",
            "merchantReference": reference,
            "pspReference": "8815",
            "success": "true"
        }
    })
}

#[tokio::test]
async fn test_webhook_all_valid_is_accepted() {
    let h = harness("Authorised");

    let response = h
        .server
        .post("/api/webhooks/notifications")
        .json(&json!({
            "live": "false",
            "notificationItems": [notification("order-1", "valid"), notification("order-2", "valid")]
        }))
        .await;

    response.assert_status_ok();
    response.assert_text("[accepted]");
    assert_eq!(*h.handler.seen.lock().unwrap(), vec!["order-1", "order-2"]);
}

#[tokio::test]
async fn test_webhook_accepts_any_currency() {
    let h = harness("Authorised");

    let response = h
        .server
        .post("/api/webhooks/notifications")
        .json(&json!({
            "live": "false",
            "notificationItems": [
                notification_item("order-se", "valid", "SEK", "AUTHORISATION"),
                notification_item("order-jp", "valid", "JPY", "AUTHORISATION")
            ]
        }))
        .await;

    response.assert_status_ok();
    response.assert_text("[accepted]");
    assert_eq!(*h.handler.seen.lock().unwrap(), vec!["order-se", "order-jp"]);
}

#[tokio::test]
async fn test_webhook_invalid_item_rejects_batch() {
    let h = harness("Authorised");

    let response = h
        .server
        .post("/api/webhooks/notifications")
        .json(&json!({
            "live": "false",
            "notificationItems": [notification("order-1", "valid"), notification("order-2", "forged")]
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_text("Invalid HMAC signature");
    assert!(h.handler.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_webhook_empty_batch_is_accepted() {
    let h = harness("Authorised");

    let response = h
        .server
        .post("/api/webhooks/notifications")
        .json(&json!({"live": "false", "notificationItems": []}))
        .await;

    response.assert_status_ok();
    response.assert_text("[accepted]");
}

#[tokio::test]
async fn test_webhook_handler_failure_asks_for_redelivery() {
    let handler = RecordingHandler {
        fail: true,
        ..Default::default()
    };
    let h = harness_with(MockProcessor::answering("Authorised"), handler);

    let response = h
        .server
        .post("/api/webhooks/notifications")
        .json(&json!({"notificationItems": [notification("order-1", "valid")]}))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_webhook_handler_failure_still_dispatches_remaining_items() {
    let handler = RecordingHandler {
        fail: true,
        ..Default::default()
    };
    let h = harness_with(MockProcessor::answering("Authorised"), handler);

    let response = h
        .server
        .post("/api/webhooks/notifications")
        .json(&json!({
            "notificationItems": [
                notification("order-1", "valid"),
                notification_item("report-1", "valid", "EUR", "REPORT_AVAILABLE")
            ]
        }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(*h.handler.seen.lock().unwrap(), vec!["report-1"]);
}

// ============================================================================
// Pages
// ============================================================================

#[tokio::test]
async fn test_checkout_page_carries_client_settings() {
    let h = harness("Authorised");

    let response = h.server.get("/checkout?type=card").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains(r#"<pre id="clientKey" hidden>test_CLIENTKEY</pre>"#));
    assert!(html.contains(r#"<div id="card" class="payment">"#));
    assert!(html.contains("checkoutshopper-test.adyen.com"));
}

#[tokio::test]
async fn test_result_pages() {
    let h = harness("Authorised");

    for (page, heading) in [
        ("success", "Payment successful"),
        ("pending", "Payment pending"),
        ("failed", "Payment refused"),
        ("error", "Something went wrong"),
    ] {
        let response = h.server.get(&format!("/result/{}", page)).await;
        response.assert_status_ok();
        assert!(response.text().contains(heading));
    }
}

#[tokio::test]
async fn test_health() {
    let h = harness("Authorised");

    let response = h.server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["provider"], "mock");
}
