//! # Notification HMAC Validation
//!
//! Adyen signs each notification item with HMAC-SHA256 over a colon-joined
//! signing string, keyed with the hex-decoded HMAC key and base64-encoded.

use base64::{engine::general_purpose::STANDARD as base64_engine, Engine as _};
use hmac::{Hmac, Mac};
use pay_core::{NotificationRequestItem, PaymentError, PaymentResult};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Validates notification signatures against a shared key
#[derive(Clone)]
pub struct HmacValidator {
    key: Vec<u8>,
}

impl HmacValidator {
    /// Create a validator from the hex key shown in the Customer Area
    pub fn new(hex_key: &str) -> PaymentResult<Self> {
        let key = hex::decode(hex_key).map_err(|e| {
            PaymentError::Configuration(format!("Invalid HMAC key: {}", e))
        })?;
        Ok(Self { key })
    }

    /// Expected signature for an item
    pub fn calculate(&self, item: &NotificationRequestItem) -> String {
        // Keys of any length are accepted by HMAC
        let mut mac = match HmacSha256::new_from_slice(&self.key) {
            Ok(mac) => mac,
            Err(_) => return String::new(),
        };
        mac.update(signing_string(item).as_bytes());
        base64_engine.encode(mac.finalize().into_bytes())
    }

    /// Whether the item's `hmacSignature` matches
    pub fn is_valid(&self, item: &NotificationRequestItem) -> bool {
        match item.hmac_signature() {
            Some(signature) if !signature.is_empty() => {
                constant_time_compare(signature, &self.calculate(item))
            }
            _ => false,
        }
    }
}

/// `pspReference:originalReference:merchantAccountCode:merchantReference:value:currency:eventCode:success`
pub fn signing_string(item: &NotificationRequestItem) -> String {
    let (value, currency) = match item.amount {
        Some(ref amount) => (amount.value.to_string(), amount.currency.clone()),
        None => (String::new(), String::new()),
    };

    [
        item.psp_reference.as_str(),
        item.original_reference.as_deref().unwrap_or(""),
        item.merchant_account_code.as_str(),
        item.merchant_reference.as_str(),
        value.as_str(),
        currency.as_str(),
        item.event_code.as_str(),
        item.success.as_str(),
    ]
    .join(":")
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}
