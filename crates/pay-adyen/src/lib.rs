//! # pay-adyen
//!
//! Adyen Checkout processor for dropin-cart.
//!
//! - **AdyenCheckoutClient** - Checkout API v71 (`/sessions`, `/paymentMethods`,
//!   `/payments`, `/payments/details`) behind `PaymentProcessor`
//! - **HmacValidator** - notification signature checks
//! - **NotificationHandler** - per-event-code reactions to verified notifications
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_adyen::AdyenCheckoutClient;
//! use pay_core::PaymentProcessor;
//!
//! // Create client from environment
//! let client = AdyenCheckoutClient::from_env()?;
//!
//! let response = client.submit_payment(&request).await?;
//! match response.continuation_data() {
//!     Some(data) => store.store(&request.reference, data.clone()).await?,
//!     None => {}
//! }
//! ```
//!
//! ## Notification Handling
//!
//! ```rust,ignore
//! use pay_adyen::webhook::{dispatch_notification, NotificationHandler};
//!
//! struct Fulfilment;
//!
//! impl NotificationHandler for Fulfilment {
//!     fn on_authorisation(&self, item: &NotificationRequestItem) -> PaymentResult<()> {
//!         // Ship the order
//!         Ok(())
//!     }
//! }
//!
//! if client.validate_hmac(&item) {
//!     dispatch_notification(&Fulfilment, &item)?;
//! }
//! ```

pub mod client;
pub mod config;
pub mod signature;
pub mod webhook;

// Re-exports
pub use client::AdyenCheckoutClient;
pub use config::{AdyenConfig, AdyenEnvironment, CHECKOUT_API_VERSION};
pub use signature::{signing_string, HmacValidator};
pub use webhook::{
    dispatch_notification, LoggingNotificationHandler, NotificationHandler,
    REQUIRED_WEBHOOK_EVENTS,
};
