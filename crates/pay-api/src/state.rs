//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the payment processor, the continuation store, and the checkout profile.

use anyhow::Context;
use axum::http::{header, HeaderMap};
use pay_adyen::{AdyenCheckoutClient, AdyenConfig, LoggingNotificationHandler, NotificationHandler};
use pay_core::{BoxedPaymentProcessor, CheckoutProfile, ContinuationStore, ReturnUrls};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public base URL; derived from the request when unset
    pub base_url: Option<String>,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Shopper reference sent with every payment
    pub shopper_reference: Option<String>,
    pub shopper_email: Option<String>,
    /// Static asset directory
    pub public_dir: PathBuf,
    /// How long continuation data is kept for a pending redirect
    pub continuation_ttl: Duration,
    /// How often expired continuation data is purged
    pub purge_interval: Duration,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            base_url: non_empty_var("BASE_URL"),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            shopper_reference: non_empty_var("SHOPPER_REFERENCE"),
            shopper_email: non_empty_var("SHOPPER_EMAIL"),
            public_dir: std::env::var("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public")),
            continuation_ttl: Duration::from_secs(secs_var("CONTINUATION_TTL_SECS", 3600)),
            purge_interval: Duration::from_secs(secs_var("CONTINUATION_PURGE_SECS", 300)),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Base URL for return URLs: `BASE_URL` if set, else the request's `Host`
    /// with the `X-Forwarded-Proto` scheme (default `http`).
    pub fn base_url_for(&self, headers: &HeaderMap) -> String {
        if let Some(ref base_url) = self.base_url {
            return base_url.clone();
        }

        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .unwrap_or_else(|| format!("localhost:{}", self.port));
        let scheme = headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("http");

        format!("{}://{}", scheme, host)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn secs_var(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Settings the Drop-in needs in the browser
#[derive(Debug, Clone)]
pub struct DropinConfig {
    /// Public client key (test_... or live_...)
    pub client_key: String,
    /// `test` or `live`
    pub environment: &'static str,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment processor client
    pub processor: BoxedPaymentProcessor,
    /// Continuation data awaiting a redirect-return
    pub continuations: Arc<dyn ContinuationStore>,
    /// Reacts to verified notifications
    pub notifications: Arc<dyn NotificationHandler>,
    /// What each checkout attempt charges
    pub profile: CheckoutProfile,
    pub dropin: DropinConfig,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by the Adyen Checkout API
    pub fn new(config: AppConfig, continuations: Arc<dyn ContinuationStore>) -> anyhow::Result<Self> {
        let adyen = AdyenConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load Adyen config: {}", e))?;
        let dropin = DropinConfig {
            client_key: adyen.client_key.clone(),
            environment: adyen.environment.as_client_str(),
        };

        let client = AdyenCheckoutClient::new(adyen)
            .map_err(|e| anyhow::anyhow!("Failed to initialize Adyen: {}", e))?;

        let profile = load_checkout_profile(&config)?;

        Ok(Self::with_processor(
            config,
            profile,
            dropin,
            Arc::new(client),
            continuations,
        ))
    }

    /// Assemble state from explicit parts (used by tests)
    pub fn with_processor(
        config: AppConfig,
        profile: CheckoutProfile,
        dropin: DropinConfig,
        processor: BoxedPaymentProcessor,
        continuations: Arc<dyn ContinuationStore>,
    ) -> Self {
        Self {
            processor,
            continuations,
            notifications: Arc::new(LoggingNotificationHandler),
            profile,
            dropin,
            config,
        }
    }

    /// Builder: replace the notification handler
    pub fn with_notification_handler(mut self, handler: Arc<dyn NotificationHandler>) -> Self {
        self.notifications = handler;
        self
    }

    /// Return URLs for the request being served
    pub fn return_urls(&self, headers: &HeaderMap) -> ReturnUrls {
        ReturnUrls::new(self.config.base_url_for(headers))
    }
}

/// Load the checkout profile from config file, then apply shopper overrides
fn load_checkout_profile(config: &AppConfig) -> anyhow::Result<CheckoutProfile> {
    // Try to load from config/checkout.toml
    let config_paths = [
        "config/checkout.toml",
        "../config/checkout.toml",
        "../../config/checkout.toml",
    ];

    let mut profile = None;
    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let loaded = CheckoutProfile::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded checkout profile from {}", path);
            profile = Some(loaded);
            break;
        }
    }

    let mut profile = profile.unwrap_or_else(|| {
        tracing::warn!("No checkout profile found, using defaults");
        CheckoutProfile::default()
    });

    if let Some(ref reference) = config.shopper_reference {
        profile = profile.with_shopper_reference(reference.clone());
    }
    if let Some(ref email) = config.shopper_email {
        profile = profile.with_shopper_email(email.clone());
    }

    Ok(profile)
}
