//! # Request Handlers
//!
//! Axum request handlers for the checkout API.
//! Every payment operation is delegated to the processor; the handlers own
//! redirect correlation and the notification batch policy.

use crate::state::AppState;
use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Form, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect},
    Json,
};
use pay_adyen::dispatch_notification;
use pay_core::{
    evaluate_batch, BatchVerdict, DetailsRequest, NotificationRequest, OrderRef, PaymentError,
    PaymentMethodsRequest, PaymentRequest, PaymentResponse, PaymentResult, RedirectDetails,
    ResultBucket, SessionRequest, SessionResponse, ACCEPTED_RESPONSE,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Payment submission from the Drop-in (`state.data`)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiatePaymentRequest {
    /// Encrypted payment method details
    pub payment_method: serde_json::Value,
    #[serde(default)]
    pub browser_info: Option<serde_json::Value>,
}

/// `orderRef` query parameter carried by the return URL
#[derive(Debug, Default, Deserialize)]
pub struct ReturnTarget {
    #[serde(rename = "orderRef", default)]
    pub order_ref: Option<String>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn payment_error_to_response(err: PaymentError) -> ApiError {
    let code = err.status_code();
    let mut response = ErrorResponse::new(err.to_string(), code);
    if let Some(error_code) = err.error_code() {
        response = response.with_details(format!("error code: {}", error_code));
    }
    (StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR), Json(response))
}

/// Log a failed processor call and turn it into a JSON error
fn processor_failure(operation: &'static str) -> impl FnOnce(PaymentError) -> ApiError {
    move |e| {
        error!(
            "{} failed: {}, error code: {}",
            operation,
            e,
            e.error_code().unwrap_or("none")
        );
        payment_error_to_response(e)
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "dropin-cart",
        "provider": state.processor.provider_name(),
        "pendingRedirects": state.continuations.len().await,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Open a checkout session (Sessions flow)
#[instrument(skip(state, headers))]
pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, ApiError> {
    let order_ref = OrderRef::generate();
    let return_url = state.return_urls(&headers).checkout_return(&order_ref);
    let request = SessionRequest::from_profile(&state.profile, order_ref, return_url);

    let session = state
        .processor
        .create_session(&request)
        .await
        .map_err(processor_failure("Session creation"))?;

    info!("Created session {} for order {}", session.id, request.reference);
    Ok(Json(session))
}

/// List payment methods for the Drop-in
#[instrument(skip(state))]
pub async fn payment_methods(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let request = PaymentMethodsRequest::from_profile(&state.profile);

    let methods = state
        .processor
        .payment_methods(&request)
        .await
        .map_err(processor_failure("Payment methods lookup"))?;

    Ok(Json(methods))
}

/// Submit a payment (Advanced flow)
///
/// When the processor answers with an action carrying `paymentData`, it is
/// kept under the new order reference until the shopper comes back.
#[instrument(skip(state, headers, request))]
pub async fn initiate_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<InitiatePaymentRequest>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let order_ref = OrderRef::generate();
    let return_url = state.return_urls(&headers).redirect_return(&order_ref);
    let payment = PaymentRequest::from_profile(
        &state.profile,
        order_ref.clone(),
        return_url,
        request.payment_method,
        request.browser_info,
    );

    let response = state
        .processor
        .submit_payment(&payment)
        .await
        .map_err(processor_failure("Payment"))?;

    if let Some(data) = response.continuation_data() {
        state
            .continuations
            .store(&order_ref, data.clone())
            .await
            .map_err(payment_error_to_response)?;
        debug!("Stored continuation data for order {}", order_ref);
    }

    info!(
        "Payment for order {}: result={:?}",
        order_ref,
        response.result_code.as_ref().map(|c| c.as_str())
    );
    Ok(Json(response))
}

/// Redirect-return via GET (parameters in the query string)
pub async fn handle_shopper_redirect_get(
    State(state): State<AppState>,
    target: Result<Query<ReturnTarget>, QueryRejection>,
    params: Result<Query<RedirectDetails>, QueryRejection>,
) -> Redirect {
    let extracted = match (target, params) {
        (Ok(Query(target)), Ok(Query(params))) => Ok((target, params)),
        (Err(rejection), _) => Err(rejected(rejection)),
        (_, Err(rejection)) => Err(rejected(rejection)),
    };
    complete_redirect(&state, extracted).await
}

/// Redirect-return via POST (parameters in the form body)
pub async fn handle_shopper_redirect_post(
    State(state): State<AppState>,
    target: Result<Query<ReturnTarget>, QueryRejection>,
    params: Result<Form<RedirectDetails>, FormRejection>,
) -> Redirect {
    let extracted = match (target, params) {
        (Ok(Query(target)), Ok(Form(params))) => Ok((target, params)),
        (Err(rejection), _) => Err(rejected(rejection)),
        (_, Err(rejection)) => Err(rejected(rejection)),
    };
    complete_redirect(&state, extracted).await
}

fn rejected(rejection: impl std::fmt::Display) -> PaymentError {
    PaymentError::InvalidRequest(format!("Malformed redirect-return: {}", rejection))
}

/// Every failure lands the shopper on the error page
async fn complete_redirect(
    state: &AppState,
    extracted: PaymentResult<(ReturnTarget, RedirectDetails)>,
) -> Redirect {
    let outcome = match extracted {
        Ok((target, params)) => finish_redirect(state, target, params).await,
        Err(e) => Err(e),
    };

    let bucket = match outcome {
        Ok(bucket) => bucket,
        Err(e) => {
            error!(
                "Redirect-return failed: {}, error code: {}",
                e,
                e.error_code().unwrap_or("none")
            );
            ResultBucket::Error
        }
    };

    Redirect::to(bucket.path())
}

#[instrument(skip(state, params), fields(order_ref = ?target.order_ref))]
async fn finish_redirect(
    state: &AppState,
    target: ReturnTarget,
    params: RedirectDetails,
) -> PaymentResult<ResultBucket> {
    let order_ref = target
        .order_ref
        .filter(|r| !r.is_empty())
        .map(OrderRef::from)
        .ok_or_else(|| PaymentError::UnknownCorrelation {
            order_ref: String::new(),
        })?;

    // Consume: a second return for the same reference finds nothing
    let payment_data = state.continuations.evict(&order_ref).await?.ok_or_else(|| {
        PaymentError::UnknownCorrelation {
            order_ref: order_ref.to_string(),
        }
    })?;

    let request = DetailsRequest {
        details: params.to_details(),
        payment_data: Some(payment_data.clone()),
    };
    let response = match state.processor.submit_details(&request).await {
        Ok(response) => response,
        Err(e @ PaymentError::NetworkError(_)) => {
            // No processor answer; the shopper may retry the return
            warn!("Restoring payment data for order {} after network failure", order_ref);
            state.continuations.store(&order_ref, payment_data).await?;
            return Err(e);
        }
        Err(e) => return Err(e),
    };
    let bucket = response.bucket();

    info!(
        "Redirect-return for order {}: result={:?} -> {}",
        order_ref,
        response.result_code.as_ref().map(|c| c.as_str()),
        bucket
    );
    Ok(bucket)
}

/// Relay in-page additional details (3-D Secure 2 challenge, etc.)
#[instrument(skip(state, request))]
pub async fn submit_additional_details(
    State(state): State<AppState>,
    Json(request): Json<DetailsRequest>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let response = state
        .processor
        .submit_details(&request)
        .await
        .map_err(processor_failure("Payment details"))?;

    Ok(Json(response))
}

/// Notification webhook
///
/// The whole batch is verified before any item is processed, and the batch
/// is answered once: `[accepted]`, 401 if any signature is bad, or the first
/// handler failure after every item has been dispatched.
#[instrument(skip(state, request), fields(items = request.notification_items.len()))]
pub async fn webhook_notifications(
    State(state): State<AppState>,
    Json(request): Json<NotificationRequest>,
) -> Result<(StatusCode, &'static str), ApiError> {
    let verdict = evaluate_batch(&request.notification_items, |item| {
        state.processor.validate_hmac(item)
    });

    let items = match verdict {
        BatchVerdict::Accepted(items) => items,
        BatchVerdict::Rejected(indexes) => {
            warn!("Invalid HMAC signature on notification items {:?}", indexes);
            return Ok((StatusCode::UNAUTHORIZED, "Invalid HMAC signature"));
        }
    };

    // Dispatch every item before answering
    let mut first_failure = None;
    for item in items {
        info!(
            "merchantReference: {} eventCode: {}",
            item.merchant_reference, item.event_code
        );
        if let Err(e) = dispatch_notification(state.notifications.as_ref(), item) {
            error!(
                "Notification handler error for {}: {}",
                item.merchant_reference, e
            );
            first_failure.get_or_insert(e);
        }
    }

    match first_failure {
        // Adyen redelivers the whole batch
        Some(e) => Err(payment_error_to_response(e)),
        None => Ok((StatusCode::OK, ACCEPTED_RESPONSE)),
    }
}
