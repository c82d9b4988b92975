//! # Payment Processor Trait
//!
//! The capability the checkout server consumes from its payment processor.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 PaymentProcessor (trait)                    │
//! │  ├── create_session()                                       │
//! │  ├── payment_methods()                                      │
//! │  ├── submit_payment()                                       │
//! │  ├── submit_details()                                       │
//! │  ├── validate_hmac()                                        │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!          ┌─────────────────┴─────────────────┐
//!          │                                   │
//!  ┌───────┴───────┐                   ┌───────┴───────┐
//!  │    Adyen      │                   │  test doubles │
//!  │CheckoutClient │                   │               │
//!  └───────────────┘                   └───────────────┘
//! ```

use crate::error::PaymentResult;
use crate::notification::NotificationRequestItem;
use crate::payment::{
    DetailsRequest, PaymentMethodsRequest, PaymentRequest, PaymentResponse, SessionRequest,
    SessionResponse,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for payment processor clients.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Open a checkout session (Sessions flow).
    async fn create_session(&self, request: &SessionRequest) -> PaymentResult<SessionResponse>;

    /// List the payment methods available to the shopper.
    ///
    /// The response is relayed to the Drop-in untouched.
    async fn payment_methods(
        &self,
        request: &PaymentMethodsRequest,
    ) -> PaymentResult<serde_json::Value>;

    /// Submit a payment (Advanced flow).
    ///
    /// # Returns
    /// The processor's answer; it may carry an action (redirect, 3-D Secure)
    /// whose continuation data must be kept until the shopper returns.
    async fn submit_payment(&self, request: &PaymentRequest) -> PaymentResult<PaymentResponse>;

    /// Submit payment details after a redirect or an in-page action.
    async fn submit_details(&self, request: &DetailsRequest) -> PaymentResult<PaymentResponse>;

    /// Check a notification item's HMAC signature.
    fn validate_hmac(&self, item: &NotificationRequestItem) -> bool;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment processor (dynamic dispatch)
pub type BoxedPaymentProcessor = Arc<dyn PaymentProcessor>;
