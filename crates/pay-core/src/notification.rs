//! # Notification Types
//!
//! Webhook notifications pushed by the payment processor, and the batch
//! policy: every item is verified before anything is processed, and the
//! batch is answered exactly once.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Acknowledgement body the processor expects for an accepted batch
pub const ACCEPTED_RESPONSE: &str = "[accepted]";

/// Notification webhook body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live: Option<String>,

    #[serde(default)]
    pub notification_items: Vec<NotificationItem>,
}

/// Wrapper object around each item in `notificationItems`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationItem {
    #[serde(rename = "NotificationRequestItem")]
    pub item: NotificationRequestItem,
}

/// A single notification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequestItem {
    /// Carries `hmacSignature` among other processor extras
    #[serde(default)]
    pub additional_data: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<NotificationAmount>,

    pub event_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<String>,

    #[serde(default)]
    pub merchant_account_code: String,

    #[serde(default)]
    pub merchant_reference: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_reference: Option<String>,

    #[serde(default)]
    pub psp_reference: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// `"true"` or `"false"` on the wire
    #[serde(default)]
    pub success: String,
}

/// Amount as reported in a notification.
///
/// The currency is kept verbatim: notifications cover every currency the
/// merchant account processes, and the HMAC signing string needs the exact text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAmount {
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub value: i64,
}

impl NotificationAmount {
    pub fn new(currency: impl Into<String>, value: i64) -> Self {
        Self {
            currency: currency.into(),
            value,
        }
    }
}

impl NotificationRequestItem {
    /// Signature supplied by the processor
    pub fn hmac_signature(&self) -> Option<&str> {
        self.additional_data.get("hmacSignature").map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        self.success == "true"
    }

    pub fn event(&self) -> EventCode {
        EventCode::from(self.event_code.as_str())
    }
}

/// Event codes this server reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventCode {
    Authorisation,
    Cancellation,
    Refund,
    Capture,
    /// Anything else (passthrough)
    Other(String),
}

impl From<&str> for EventCode {
    fn from(code: &str) -> Self {
        match code {
            "AUTHORISATION" => EventCode::Authorisation,
            "CANCELLATION" => EventCode::Cancellation,
            "REFUND" => EventCode::Refund,
            "CAPTURE" => EventCode::Capture,
            other => EventCode::Other(other.to_string()),
        }
    }
}

/// Outcome of verifying a whole batch
#[derive(Debug, PartialEq)]
pub enum BatchVerdict<'a> {
    /// Every item verified; process all of them
    Accepted(Vec<&'a NotificationRequestItem>),
    /// At least one item failed; process none. Holds the failing indexes.
    Rejected(Vec<usize>),
}

/// Verify every item with `verify`, then decide for the batch as a whole.
/// An empty batch is accepted.
pub fn evaluate_batch<'a, F>(items: &'a [NotificationItem], verify: F) -> BatchVerdict<'a>
where
    F: Fn(&NotificationRequestItem) -> bool,
{
    let rejected: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, wrapper)| !verify(&wrapper.item))
        .map(|(index, _)| index)
        .collect();

    if rejected.is_empty() {
        BatchVerdict::Accepted(items.iter().map(|wrapper| &wrapper.item).collect())
    } else {
        BatchVerdict::Rejected(rejected)
    }
}
