//! # dropin-cart
//!
//! Demo checkout server for the Adyen Drop-in.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export CHECKOUT_APIKEY=AQE...
//! export CLIENT_KEY=test_...
//! export MERCHANT_ACCOUNT=YourMerchantAccount
//! export ADYEN_HMAC_KEY=44782DEF...
//!
//! # Run the server
//! dropin-cart
//! ```

use pay_api::{routes, state::AppConfig, state::AppState};
use pay_core::{ContinuationStore, InMemoryContinuationStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }

    // Print banner
    print_banner();

    // Initialize application state
    let config = AppConfig::from_env();
    let ttl = chrono::Duration::from_std(config.continuation_ttl)?;
    let store = InMemoryContinuationStore::with_ttl(ttl);
    spawn_purge_task(store.clone(), config.purge_interval);

    let state = AppState::new(config, Arc::new(store) as Arc<dyn ContinuationStore>)?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.processor.provider_name());
    info!(
        "Checkout amount: {} ({})",
        state.profile.amount.display(),
        state.profile.country_code
    );

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("🚀 dropin-cart starting on http://{}", addr);

    if !is_prod {
        info!("🛒 Shop: http://{}/", addr);
        info!("💳 Payments: POST http://{}/api/initiatePayment", addr);
        info!("🔔 Webhook: POST http://{}/api/webhooks/notifications", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically drop continuation data whose shopper never came back
fn spawn_purge_task(store: InMemoryContinuationStore, every: Duration) {
    tokio::spawn(async move {
        // interval() panics on a zero period
        let mut ticker = tokio::time::interval(every.max(Duration::from_secs(1)));
        loop {
            ticker.tick().await;
            let purged = store.purge_expired().await;
            if purged > 0 {
                info!("Purged {} expired continuation records", purged);
            } else {
                debug!("No expired continuation records");
            }
        }
    });
}

fn print_banner() {
    println!(
        r#"
  🛒 dropin-cart
  ━━━━━━━━━━━━━━━━━━━━━━━
  Adyen Drop-in checkout server
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
