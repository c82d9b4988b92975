//! # Checkout Profile
//!
//! What a checkout attempt charges and how it is presented to the processor.
//! Loaded from `config/checkout.toml`; missing fields fall back to the demo defaults.

use crate::amount::{Amount, Currency, LineItem};
use crate::payment::OrderRef;
use serde::{Deserialize, Serialize};

/// Per-attempt payment parameters shared by sessions and payments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutProfile {
    /// Amount charged per checkout attempt
    pub amount: Amount,

    /// ISO 3166 country code of the shopper
    pub country_code: String,

    /// Drop-in locale
    pub locale: String,

    /// Sales channel
    pub channel: String,

    pub shopper_interaction: String,

    pub recurring_processing_model: String,

    /// Recurring contract types requested for tokenisation
    pub recurring_contract: Option<String>,

    /// Ask the processor to store the payment method
    pub store_payment_method: bool,

    /// Shopper reference used for stored payment methods
    pub shopper_reference: Option<String>,

    pub shopper_email: Option<String>,

    pub line_items: Vec<LineItem>,
}

impl Default for CheckoutProfile {
    fn default() -> Self {
        Self {
            amount: Amount::new(Currency::AUD, 10000),
            country_code: "AU".to_string(),
            locale: "en_AU".to_string(),
            channel: "Web".to_string(),
            shopper_interaction: "Ecommerce".to_string(),
            recurring_processing_model: "CardOnFile".to_string(),
            recurring_contract: Some("RECURRING,ONECLICK".to_string()),
            store_payment_method: true,
            shopper_reference: None,
            shopper_email: None,
            line_items: vec![LineItem::new(1, 1000, "item")],
        }
    }
}

impl CheckoutProfile {
    /// Load a profile from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Builder: set the shopper reference
    pub fn with_shopper_reference(mut self, reference: impl Into<String>) -> Self {
        self.shopper_reference = Some(reference.into());
        self
    }

    /// Builder: set the shopper email
    pub fn with_shopper_email(mut self, email: impl Into<String>) -> Self {
        self.shopper_email = Some(email.into());
        self
    }
}

/// Return URLs handed to the processor, all carrying the order reference
#[derive(Debug, Clone)]
pub struct ReturnUrls {
    /// Base URL of the application (e.g., "http://localhost:8080")
    pub base_url: String,
}

impl ReturnUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Return URL for the Sessions flow (shopper lands back on the checkout page)
    pub fn checkout_return(&self, order_ref: &OrderRef) -> String {
        format!("{}/checkout?orderRef={}", self.base_url, order_ref)
    }

    /// Return URL for the Advanced flow (shopper lands on the redirect handler)
    pub fn redirect_return(&self, order_ref: &OrderRef) -> String {
        format!(
            "{}/api/handleShopperRedirect?orderRef={}",
            self.base_url, order_ref
        )
    }
}
