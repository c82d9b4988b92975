//! # Amount Types
//!
//! Currencies and minor-unit amounts as the Checkout API expects them.

use serde::{Deserialize, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    AUD,
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    CHF,
    NZD,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::AUD => "AUD",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::CHF => "CHF",
            Currency::NZD => "NZD",
        }
    }

    /// Returns the number of decimal places for this currency
    /// (JPY has 0 decimals, most others have 2)
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Convert from minor units back to decimal
    pub fn from_minor_units(&self, value: i64) -> f64 {
        let divisor = 10_f64.powi(self.decimal_places() as i32);
        value as f64 / divisor
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::AUD
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amount in minor units (`{"currency": "AUD", "value": 10000}` on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub currency: Currency,
    /// Minor units (cents for AUD)
    pub value: i64,
}

impl Amount {
    pub fn new(currency: Currency, value: i64) -> Self {
        Self { currency, value }
    }

    /// Format for display (e.g., "A$100.00")
    pub fn display(&self) -> String {
        let symbol = match self.currency {
            Currency::AUD => "A$",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::CAD => "C$",
            Currency::CHF => "CHF ",
            Currency::NZD => "NZ$",
        };
        if self.currency.decimal_places() == 0 {
            format!("{}{}", symbol, self.value)
        } else {
            format!("{}{:.2}", symbol, self.currency.from_minor_units(self.value))
        }
    }
}

/// Line item sent along with sessions and payments (required by some methods, e.g. Klarna)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub quantity: u32,
    /// Minor units, tax included
    pub amount_including_tax: i64,
    pub description: String,
}

impl LineItem {
    pub fn new(quantity: u32, amount_including_tax: i64, description: impl Into<String>) -> Self {
        Self {
            quantity,
            amount_including_tax,
            description: description.into(),
        }
    }
}
