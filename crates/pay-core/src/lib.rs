//! # pay-core
//!
//! Core types and traits for the dropin-cart checkout server.
//!
//! This crate provides:
//! - `PaymentProcessor` trait implemented by processor clients
//! - `ContinuationStore` for correlating redirects with pending payments
//! - `classify` for mapping result codes to result pages
//! - Notification types and the batch verification policy
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{CheckoutProfile, OrderRef, PaymentRequest, ReturnUrls};
//!
//! let order_ref = OrderRef::generate();
//! let return_url = urls.redirect_return(&order_ref);
//! let request = PaymentRequest::from_profile(&profile, order_ref.clone(), return_url, method, None);
//!
//! let response = processor.submit_payment(&request).await?;
//! if let Some(data) = response.continuation_data() {
//!     store.store(&order_ref, data.clone()).await?;
//! }
//! ```

pub mod amount;
pub mod checkout;
pub mod correlation;
pub mod error;
pub mod notification;
pub mod payment;
pub mod processor;
pub mod result;

// Re-exports for convenience
pub use amount::{Amount, Currency, LineItem};
pub use checkout::{CheckoutProfile, ReturnUrls};
pub use correlation::ContinuationStore;
#[cfg(feature = "memory-store")]
pub use correlation::InMemoryContinuationStore;
pub use error::{PaymentError, PaymentResult};
pub use notification::{
    evaluate_batch, BatchVerdict, EventCode, NotificationAmount, NotificationItem,
    NotificationRequest, NotificationRequestItem, ACCEPTED_RESPONSE,
};
pub use payment::{
    ContinuationData, DetailsRequest, OrderRef, PaymentAction, PaymentMethodsRequest,
    PaymentRequest, PaymentResponse, RedirectDetails, SessionRequest, SessionResponse,
};
pub use processor::{BoxedPaymentProcessor, PaymentProcessor};
pub use result::{classify, ResultBucket, ResultCode};
