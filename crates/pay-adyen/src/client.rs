//! # Adyen Checkout Client
//!
//! Implementation of the Adyen Checkout API (`/sessions`, `/paymentMethods`,
//! `/payments`, `/payments/details`) behind the `PaymentProcessor` trait.

use crate::config::AdyenConfig;
use crate::signature::HmacValidator;
use async_trait::async_trait;
use pay_core::{
    Amount, DetailsRequest, LineItem, NotificationRequestItem, PaymentError,
    PaymentMethodsRequest, PaymentProcessor, PaymentRequest, PaymentResponse, PaymentResult,
    SessionRequest, SessionResponse,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "adyen";

/// Adyen Checkout processor
///
/// Drop-in / Components flows: the browser collects encrypted card data,
/// this client forwards it to Adyen with the merchant's API key.
pub struct AdyenCheckoutClient {
    config: AdyenConfig,
    client: Client,
    validator: HmacValidator,
}

impl AdyenCheckoutClient {
    /// Create a new client
    pub fn new(config: AdyenConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;
        let validator = HmacValidator::new(&config.hmac_key)?;

        Ok(Self {
            config,
            client,
            validator,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = AdyenConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &AdyenConfig {
        &self.config
    }

    /// POST a JSON body to a Checkout endpoint and decode the answer
    async fn post<B, R>(&self, path: &str, body: &B, idempotency_key: Option<&str>) -> PaymentResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.config.endpoint(path);

        let mut request = self
            .client
            .post(&url)
            .header("X-API-Key", &self.config.api_key)
            .json(body);
        if let Some(key) = idempotency_key {
            request = request.header("Idempotency-Key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Adyen API error: path={}, status={}, body={}", path, status, body);

            // Parse Adyen error
            if let Ok(error_response) = serde_json::from_str::<AdyenErrorResponse>(&body) {
                return Err(PaymentError::ProviderError {
                    provider: PROVIDER.to_string(),
                    status: status.as_u16(),
                    message: error_response.message,
                    error_code: error_response.error_code,
                });
            }

            return Err(PaymentError::provider(
                PROVIDER,
                status.as_u16(),
                format!("HTTP {}: {}", status, body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Adyen response: {}", e))
        })
    }
}

#[async_trait]
impl PaymentProcessor for AdyenCheckoutClient {
    #[instrument(skip(self, request), fields(reference = %request.reference))]
    async fn create_session(&self, request: &SessionRequest) -> PaymentResult<SessionResponse> {
        let body = AdyenSessionRequest {
            merchant_account: &self.config.merchant_account,
            reference: request.reference.as_str(),
            amount: request.amount,
            country_code: &request.country_code,
            return_url: &request.return_url,
            shopper_reference: request.shopper_reference.as_deref(),
            shopper_email: request.shopper_email.as_deref(),
            recurring: request
                .recurring_contract
                .as_deref()
                .map(|contract| AdyenRecurring { contract }),
            line_items: &request.line_items,
        };

        let session: SessionResponse = self
            .post("/sessions", &body, Some(request.reference.as_str()))
            .await?;

        info!("Created Adyen session: id={}", session.id);
        Ok(session)
    }

    #[instrument(skip(self, request))]
    async fn payment_methods(
        &self,
        request: &PaymentMethodsRequest,
    ) -> PaymentResult<serde_json::Value> {
        let body = AdyenPaymentMethodsRequest {
            merchant_account: &self.config.merchant_account,
            channel: &request.channel,
            shopper_reference: request.shopper_reference.as_deref(),
        };

        self.post("/paymentMethods", &body, None).await
    }

    #[instrument(skip(self, request), fields(reference = %request.reference))]
    async fn submit_payment(&self, request: &PaymentRequest) -> PaymentResult<PaymentResponse> {
        let body = AdyenPaymentRequest {
            merchant_account: &self.config.merchant_account,
            reference: request.reference.as_str(),
            amount: request.amount,
            country_code: &request.country_code,
            channel: &request.channel,
            return_url: &request.return_url,
            payment_method: &request.payment_method,
            browser_info: request.browser_info.as_ref(),
            shopper_interaction: &request.shopper_interaction,
            recurring_processing_model: &request.recurring_processing_model,
            shopper_reference: request.shopper_reference.as_deref(),
            shopper_email: request.shopper_email.as_deref(),
            recurring: request
                .recurring_contract
                .as_deref()
                .map(|contract| AdyenRecurring { contract }),
            store_payment_method: request.store_payment_method,
            line_items: &request.line_items,
        };

        let response: PaymentResponse = self
            .post("/payments", &body, Some(request.reference.as_str()))
            .await?;

        debug!(
            "Adyen payment result: code={:?}, action={}",
            response.result_code,
            response.action.is_some()
        );
        Ok(response)
    }

    #[instrument(skip(self, request))]
    async fn submit_details(&self, request: &DetailsRequest) -> PaymentResult<PaymentResponse> {
        let response: PaymentResponse = self.post("/payments/details", request, None).await?;

        debug!("Adyen payment details result: code={:?}", response.result_code);
        Ok(response)
    }

    fn validate_hmac(&self, item: &NotificationRequestItem) -> bool {
        self.validator.is_valid(item)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Adyen API Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdyenRecurring<'a> {
    contract: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdyenSessionRequest<'a> {
    merchant_account: &'a str,
    reference: &'a str,
    amount: Amount,
    country_code: &'a str,
    return_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    shopper_reference: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shopper_email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recurring: Option<AdyenRecurring<'a>>,
    line_items: &'a [LineItem],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdyenPaymentMethodsRequest<'a> {
    merchant_account: &'a str,
    channel: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    shopper_reference: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdyenPaymentRequest<'a> {
    merchant_account: &'a str,
    reference: &'a str,
    amount: Amount,
    country_code: &'a str,
    channel: &'a str,
    return_url: &'a str,
    payment_method: &'a serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    browser_info: Option<&'a serde_json::Value>,
    shopper_interaction: &'a str,
    recurring_processing_model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    shopper_reference: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shopper_email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recurring: Option<AdyenRecurring<'a>>,
    store_payment_method: bool,
    line_items: &'a [LineItem],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdyenErrorResponse {
    message: String,
    #[serde(default)]
    error_code: Option<String>,
}
