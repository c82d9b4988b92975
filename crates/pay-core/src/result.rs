//! # Result Classification
//!
//! Maps a processor result code to the outcome page the shopper is sent to.
//! The browser runs the same function through `pay-wasm`, so both sides
//! always agree on where a given result code lands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome reported by the payment processor for a payment attempt
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResultCode {
    Authorised,
    Pending,
    Received,
    Refused,
    Cancelled,
    Error,
    RedirectShopper,
    IdentifyShopper,
    ChallengeShopper,
    PresentToShopper,
    /// Any other code, kept verbatim
    Other(String),
}

impl ResultCode {
    pub fn as_str(&self) -> &str {
        match self {
            ResultCode::Authorised => "Authorised",
            ResultCode::Pending => "Pending",
            ResultCode::Received => "Received",
            ResultCode::Refused => "Refused",
            ResultCode::Cancelled => "Cancelled",
            ResultCode::Error => "Error",
            ResultCode::RedirectShopper => "RedirectShopper",
            ResultCode::IdentifyShopper => "IdentifyShopper",
            ResultCode::ChallengeShopper => "ChallengeShopper",
            ResultCode::PresentToShopper => "PresentToShopper",
            ResultCode::Other(code) => code,
        }
    }

    /// Outcome bucket for this code
    pub fn bucket(&self) -> ResultBucket {
        classify(self.as_str())
    }
}

impl From<&str> for ResultCode {
    fn from(code: &str) -> Self {
        match code {
            "Authorised" => ResultCode::Authorised,
            "Pending" => ResultCode::Pending,
            "Received" => ResultCode::Received,
            "Refused" => ResultCode::Refused,
            "Cancelled" => ResultCode::Cancelled,
            "Error" => ResultCode::Error,
            "RedirectShopper" => ResultCode::RedirectShopper,
            "IdentifyShopper" => ResultCode::IdentifyShopper,
            "ChallengeShopper" => ResultCode::ChallengeShopper,
            "PresentToShopper" => ResultCode::PresentToShopper,
            other => ResultCode::Other(other.to_string()),
        }
    }
}

impl From<String> for ResultCode {
    fn from(code: String) -> Self {
        ResultCode::from(code.as_str())
    }
}

impl From<ResultCode> for String {
    fn from(code: ResultCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shopper-facing outcome of a payment attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultBucket {
    Success,
    Pending,
    Failed,
    Error,
}

impl ResultBucket {
    pub const ALL: [ResultBucket; 4] = [
        ResultBucket::Success,
        ResultBucket::Pending,
        ResultBucket::Failed,
        ResultBucket::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultBucket::Success => "success",
            ResultBucket::Pending => "pending",
            ResultBucket::Failed => "failed",
            ResultBucket::Error => "error",
        }
    }

    /// Result page path the shopper is redirected to
    pub fn path(&self) -> &'static str {
        match self {
            ResultBucket::Success => "/result/success",
            ResultBucket::Pending => "/result/pending",
            ResultBucket::Failed => "/result/failed",
            ResultBucket::Error => "/result/error",
        }
    }

    /// Parse the `{type}` segment of a result page path
    pub fn from_page_type(page_type: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == page_type)
    }
}

impl fmt::Display for ResultBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw result code. Exact, case-sensitive match; anything
/// unrecognised (including the empty string) is an error.
pub fn classify(result_code: &str) -> ResultBucket {
    match result_code {
        "Authorised" => ResultBucket::Success,
        "Pending" | "Received" => ResultBucket::Pending,
        "Refused" => ResultBucket::Failed,
        _ => ResultBucket::Error,
    }
}
