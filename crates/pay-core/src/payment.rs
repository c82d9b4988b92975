//! # Payment Types
//!
//! Order references, continuation data, and the request/response shapes
//! exchanged with the payment processor. Responses keep every field the
//! processor sent (`extra`) so they can be relayed to the browser unchanged.

use crate::amount::{Amount, LineItem};
use crate::checkout::CheckoutProfile;
use crate::result::{ResultBucket, ResultCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Unique reference minted per checkout attempt
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderRef(String);

impl OrderRef {
    /// Mint a fresh reference
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OrderRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for OrderRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for OrderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque processor data needed to finish a payment after a redirect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinuationData(String);

impl ContinuationData {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContinuationData {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Request to open a checkout session (Sessions flow)
#[derive(Debug, Clone, Serialize)]
pub struct SessionRequest {
    pub reference: OrderRef,
    pub amount: Amount,
    pub country_code: String,
    pub return_url: String,
    pub shopper_reference: Option<String>,
    pub shopper_email: Option<String>,
    pub recurring_contract: Option<String>,
    pub line_items: Vec<LineItem>,
}

impl SessionRequest {
    pub fn from_profile(
        profile: &CheckoutProfile,
        reference: OrderRef,
        return_url: impl Into<String>,
    ) -> Self {
        Self {
            reference,
            amount: profile.amount,
            country_code: profile.country_code.clone(),
            return_url: return_url.into(),
            shopper_reference: profile.shopper_reference.clone(),
            shopper_email: profile.shopper_email.clone(),
            recurring_contract: profile.recurring_contract.clone(),
            line_items: profile.line_items.clone(),
        }
    }
}

/// Session created by the processor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub session_data: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request for the payment methods available to the shopper
#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethodsRequest {
    pub channel: String,
    pub shopper_reference: Option<String>,
}

impl PaymentMethodsRequest {
    pub fn from_profile(profile: &CheckoutProfile) -> Self {
        Self {
            channel: profile.channel.clone(),
            shopper_reference: profile.shopper_reference.clone(),
        }
    }
}

/// Payment submission (Advanced flow)
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequest {
    pub reference: OrderRef,
    pub amount: Amount,
    pub country_code: String,
    pub channel: String,
    pub return_url: String,
    /// Encrypted payment method state from the Drop-in
    pub payment_method: Value,
    pub browser_info: Option<Value>,
    pub shopper_interaction: String,
    pub recurring_processing_model: String,
    pub shopper_reference: Option<String>,
    pub shopper_email: Option<String>,
    pub recurring_contract: Option<String>,
    pub store_payment_method: bool,
    pub line_items: Vec<LineItem>,
}

impl PaymentRequest {
    pub fn from_profile(
        profile: &CheckoutProfile,
        reference: OrderRef,
        return_url: impl Into<String>,
        payment_method: Value,
        browser_info: Option<Value>,
    ) -> Self {
        Self {
            reference,
            amount: profile.amount,
            country_code: profile.country_code.clone(),
            channel: profile.channel.clone(),
            return_url: return_url.into(),
            payment_method,
            browser_info,
            shopper_interaction: profile.shopper_interaction.clone(),
            recurring_processing_model: profile.recurring_processing_model.clone(),
            shopper_reference: profile.shopper_reference.clone(),
            shopper_email: profile.shopper_email.clone(),
            recurring_contract: profile.recurring_contract.clone(),
            store_payment_method: profile.store_payment_method,
            line_items: profile.line_items.clone(),
        }
    }
}

/// Follow-up action the shopper has to complete (redirect, 3-D Secure, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAction {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<ContinuationData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Processor answer to a payment or payment-details submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_code: Option<ResultCode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<PaymentAction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psp_reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal_reason: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PaymentResponse {
    /// Response carrying only a result code
    pub fn with_result(code: impl Into<ResultCode>) -> Self {
        Self {
            result_code: Some(code.into()),
            ..Default::default()
        }
    }

    /// Continuation data to hold on to while the shopper is redirected
    pub fn continuation_data(&self) -> Option<&ContinuationData> {
        self.action.as_ref().and_then(|a| a.payment_data.as_ref())
    }

    /// Outcome bucket; a missing result code counts as an error
    pub fn bucket(&self) -> ResultBucket {
        self.result_code
            .as_ref()
            .map(ResultCode::bucket)
            .unwrap_or(ResultBucket::Error)
    }
}

/// Payment-details submission (after a redirect or an in-page action)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsRequest {
    #[serde(default)]
    pub details: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<ContinuationData>,
}

/// Parameters the processor appends when sending the shopper back
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RedirectDetails {
    #[serde(rename = "redirectResult", default)]
    pub redirect_result: Option<String>,

    /// Legacy 3-D Secure 1 merchant data
    #[serde(rename = "MD", default)]
    pub md: Option<String>,

    /// Legacy 3-D Secure 1 authentication response
    #[serde(rename = "PaRes", default)]
    pub pa_res: Option<String>,
}

impl RedirectDetails {
    /// Details object for the processor: `redirectResult` when present, else `MD` + `PaRes`
    pub fn to_details(&self) -> Value {
        let mut details = Map::new();
        if let Some(ref result) = self.redirect_result {
            details.insert("redirectResult".to_string(), Value::String(result.clone()));
        } else {
            if let Some(ref md) = self.md {
                details.insert("MD".to_string(), Value::String(md.clone()));
            }
            if let Some(ref pa_res) = self.pa_res {
                details.insert("PaRes".to_string(), Value::String(pa_res.clone()));
            }
        }
        Value::Object(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_refs_are_unique() {
        let a = OrderRef::generate();
        let b = OrderRef::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_payment_response_with_action() {
        let response: PaymentResponse = serde_json::from_value(json!({
            "resultCode": "RedirectShopper",
            "action": {
                "type": "redirect",
                "paymentData": "cont-123",
                "url": "https://issuer.example/3ds",
                "method": "GET"
            },
            "pspReference": "8815"
        }))
        .unwrap();

        assert_eq!(response.result_code, Some(ResultCode::RedirectShopper));
        assert_eq!(response.continuation_data(), Some(&ContinuationData::from("cont-123")));
        assert_eq!(response.bucket(), ResultBucket::Error);

        // Unknown fields survive the relay
        let relayed = serde_json::to_value(&response).unwrap();
        assert_eq!(relayed["action"]["method"], "GET");
        assert_eq!(relayed["pspReference"], "8815");
    }

    #[test]
    fn test_payment_response_without_result_code() {
        let response: PaymentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(response.bucket(), ResultBucket::Error);
        assert!(response.continuation_data().is_none());
    }

    #[test]
    fn test_redirect_details_prefers_redirect_result() {
        let params = RedirectDetails {
            redirect_result: Some("abc".into()),
            md: Some("md".into()),
            pa_res: Some("pares".into()),
        };
        assert_eq!(params.to_details(), json!({"redirectResult": "abc"}));
    }

    #[test]
    fn test_redirect_details_legacy_3ds() {
        let params = RedirectDetails {
            redirect_result: None,
            md: Some("md".into()),
            pa_res: Some("pares".into()),
        };
        assert_eq!(params.to_details(), json!({"MD": "md", "PaRes": "pares"}));
    }

    #[test]
    fn test_details_request_wire_format() {
        let request = DetailsRequest {
            details: json!({"redirectResult": "abc"}),
            payment_data: Some(ContinuationData::from("cont-123")),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"details": {"redirectResult": "abc"}, "paymentData": "cont-123"})
        );
    }

    #[test]
    fn test_payment_request_from_profile() {
        let profile = CheckoutProfile::default().with_shopper_reference("shopper-1");
        let request = PaymentRequest::from_profile(
            &profile,
            OrderRef::from("order-1"),
            "http://localhost/api/handleShopperRedirect?orderRef=order-1",
            json!({"type": "scheme"}),
            None,
        );
        assert_eq!(request.reference.as_str(), "order-1");
        assert_eq!(request.shopper_reference.as_deref(), Some("shopper-1"));
        assert_eq!(request.amount.value, 10000);
    }
}
