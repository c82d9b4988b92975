//! # Adyen Notification Handling
//!
//! Standard notifications arrive in batches. The server verifies the whole
//! batch first (see `pay_core::evaluate_batch`), then hands each item to a
//! `NotificationHandler` keyed on its event code.

use pay_core::{EventCode, NotificationRequestItem, PaymentResult};
use tracing::{debug, info, warn};

/// Notification handler trait
///
/// Implement this trait to react to specific event codes. Every method
/// defaults to logging the item.
///
/// Implementations must be idempotent per `pspReference` and event code.
/// An error from any item fails the whole batch, and Adyen then redelivers
/// every item in it, including the ones that were already handled.
#[allow(unused_variables)]
pub trait NotificationHandler: Send + Sync {
    /// Called for `AUTHORISATION`
    fn on_authorisation(&self, item: &NotificationRequestItem) -> PaymentResult<()> {
        if item.is_success() {
            info!(
                "Payment authorised: order={}, psp={}",
                item.merchant_reference, item.psp_reference
            );
        } else {
            warn!(
                "Payment not authorised: order={}, reason={:?}",
                item.merchant_reference, item.reason
            );
        }
        Ok(())
    }

    /// Called for `CANCELLATION`
    fn on_cancellation(&self, item: &NotificationRequestItem) -> PaymentResult<()> {
        info!(
            "Payment cancelled: order={}, success={}",
            item.merchant_reference, item.success
        );
        Ok(())
    }

    /// Called for `REFUND`
    fn on_refund(&self, item: &NotificationRequestItem) -> PaymentResult<()> {
        info!(
            "Refund: original={:?}, success={}",
            item.original_reference, item.success
        );
        Ok(())
    }

    /// Called for `CAPTURE`
    fn on_capture(&self, item: &NotificationRequestItem) -> PaymentResult<()> {
        info!(
            "Capture: original={:?}, success={}",
            item.original_reference, item.success
        );
        Ok(())
    }

    /// Called for every other event code
    fn on_other(&self, item: &NotificationRequestItem) -> PaymentResult<()> {
        debug!("Unhandled notification: event={}", item.event_code);
        Ok(())
    }
}

/// Default handler (just logs items)
pub struct LoggingNotificationHandler;

impl NotificationHandler for LoggingNotificationHandler {}

/// Dispatch a verified notification item to the matching handler method
pub fn dispatch_notification(
    handler: &dyn NotificationHandler,
    item: &NotificationRequestItem,
) -> PaymentResult<()> {
    match item.event() {
        EventCode::Authorisation => handler.on_authorisation(item),
        EventCode::Cancellation => handler.on_cancellation(item),
        EventCode::Refund => handler.on_refund(item),
        EventCode::Capture => handler.on_capture(item),
        EventCode::Other(_) => handler.on_other(item),
    }
}

/// Event codes to enable on the Customer Area webhook
pub const REQUIRED_WEBHOOK_EVENTS: &[&str] = &["AUTHORISATION", "CANCELLATION", "REFUND", "CAPTURE"];
