//! # Routes
//!
//! Axum router configuration for the checkout server.

use crate::handlers;
use crate::pages;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Create the main application router
///
/// Routes:
/// - API:
///   - POST /api/sessions - Open a checkout session
///   - POST /api/getPaymentMethods - List payment methods
///   - POST /api/initiatePayment - Submit a payment
///   - GET|POST /api/handleShopperRedirect - Shopper returns from a redirect
///   - POST /api/submitAdditionalDetails - Relay in-page action details
///
/// - Webhooks:
///   - POST /api/webhooks/notifications - Notification batches
///
/// - Pages:
///   - GET /, /preview, /checkout, /result/{type}, /product, /product-2
///
/// Anything else is served from the public directory.
pub fn create_router(state: AppState) -> Router {
    let public_dir = state.config.public_dir.clone();

    // API routes
    let api_routes = Router::new()
        .route("/sessions", post(handlers::create_session))
        .route("/getPaymentMethods", post(handlers::payment_methods))
        .route("/initiatePayment", post(handlers::initiate_payment))
        .route(
            "/handleShopperRedirect",
            get(handlers::handle_shopper_redirect_get).post(handlers::handle_shopper_redirect_post),
        )
        .route("/submitAdditionalDetails", post(handlers::submit_additional_details))
        // Webhooks
        .route("/webhooks/notifications", post(handlers::webhook_notifications));

    // Client side pages
    let page_routes = Router::new()
        .route("/", get(pages::index))
        .route("/preview", get(pages::preview))
        .route("/checkout", get(pages::checkout))
        .route("/result/{type}", get(pages::result))
        .route("/product", get(pages::product))
        .route("/product-2", get(pages::product_2));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health))
        .merge(page_routes)
        .nest("/api", api_routes)
        // Static assets (checkout.js, styles.css, wasm package)
        .fallback_service(ServeDir::new(public_dir))
        // Middleware
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        // State
        .with_state(state)
}
