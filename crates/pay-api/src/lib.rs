//! # pay-api
//!
//! HTTP layer for dropin-cart.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Checkout endpoints backed by a `PaymentProcessor`
//! - Redirect-return correlation through a `ContinuationStore`
//! - The notification webhook
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/sessions` | Create checkout session |
//! | POST | `/api/getPaymentMethods` | List payment methods |
//! | POST | `/api/initiatePayment` | Submit payment |
//! | GET, POST | `/api/handleShopperRedirect` | Redirect-return |
//! | POST | `/api/submitAdditionalDetails` | Submit action details |
//! | POST | `/api/webhooks/notifications` | Notification webhook |

pub mod handlers;
pub mod pages;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState, DropinConfig};
