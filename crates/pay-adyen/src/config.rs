//! # Adyen Configuration
//!
//! Configuration management for the Adyen Checkout integration.
//! All secrets are loaded from environment variables.

use pay_core::PaymentError;
use std::env;

/// Checkout API version used for every call
pub const CHECKOUT_API_VERSION: &str = "v71";

/// Adyen platform to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdyenEnvironment {
    Test,
    Live,
}

impl AdyenEnvironment {
    /// Parse `TEST` / `LIVE` (case-insensitive)
    pub fn parse(value: &str) -> Result<Self, PaymentError> {
        match value.to_ascii_uppercase().as_str() {
            "TEST" => Ok(AdyenEnvironment::Test),
            "LIVE" => Ok(AdyenEnvironment::Live),
            other => Err(PaymentError::Configuration(format!(
                "ADYEN_ENVIRONMENT must be TEST or LIVE, got {}",
                other
            ))),
        }
    }

    /// Lower-case name the Drop-in expects (`environment: "test"`)
    pub fn as_client_str(&self) -> &'static str {
        match self {
            AdyenEnvironment::Test => "test",
            AdyenEnvironment::Live => "live",
        }
    }
}

/// Adyen API configuration
#[derive(Debug, Clone)]
pub struct AdyenConfig {
    /// Server-side API key
    pub api_key: String,

    /// Client key for the Drop-in (test_... or live_...)
    pub client_key: String,

    /// Merchant account the payments are booked on
    pub merchant_account: String,

    /// Hex-encoded HMAC key for notification signatures
    pub hmac_key: String,

    pub environment: AdyenEnvironment,

    /// Checkout API base URL including the version (for testing/mocking)
    pub api_base_url: String,
}

impl AdyenConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `CHECKOUT_APIKEY`
    /// - `CLIENT_KEY`
    /// - `MERCHANT_ACCOUNT`
    /// - `ADYEN_HMAC_KEY`
    /// - `ADYEN_LIVE_URL_PREFIX` (only with `ADYEN_ENVIRONMENT=LIVE`)
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_key = required("CHECKOUT_APIKEY")?;
        let client_key = required("CLIENT_KEY")?;
        let merchant_account = required("MERCHANT_ACCOUNT")?;
        let hmac_key = required("ADYEN_HMAC_KEY")?;

        let environment = match env::var("ADYEN_ENVIRONMENT") {
            Ok(value) => AdyenEnvironment::parse(&value)?,
            Err(_) => AdyenEnvironment::Test,
        };

        let api_base_url = match environment {
            AdyenEnvironment::Test => test_base_url(),
            AdyenEnvironment::Live => live_base_url(&required("ADYEN_LIVE_URL_PREFIX")?),
        };

        let config = Self {
            api_key,
            client_key,
            merchant_account,
            hmac_key,
            environment,
            api_base_url,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create a test-environment config with explicit values (for testing)
    pub fn new(
        api_key: impl Into<String>,
        client_key: impl Into<String>,
        merchant_account: impl Into<String>,
        hmac_key: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            client_key: client_key.into(),
            merchant_account: merchant_account.into(),
            hmac_key: hmac_key.into(),
            environment: AdyenEnvironment::Test,
            api_base_url: test_base_url(),
        }
    }

    /// Check key formats against the configured environment
    pub fn validate(&self) -> Result<(), PaymentError> {
        let expected_prefix = match self.environment {
            AdyenEnvironment::Test => "test_",
            AdyenEnvironment::Live => "live_",
        };
        if !self.client_key.starts_with(expected_prefix) {
            return Err(PaymentError::Configuration(format!(
                "CLIENT_KEY must start with {} in the {:?} environment",
                expected_prefix, self.environment
            )));
        }

        if self.hmac_key.is_empty() || hex::decode(&self.hmac_key).is_err() {
            return Err(PaymentError::Configuration(
                "ADYEN_HMAC_KEY must be a hex string".to_string(),
            ));
        }

        Ok(())
    }

    /// Check if talking to the test platform
    pub fn is_test_mode(&self) -> bool {
        self.environment == AdyenEnvironment::Test
    }

    /// Full URL of a Checkout API endpoint (e.g. `/payments`)
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url.trim_end_matches('/'), path)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

fn required(name: &str) -> Result<String, PaymentError> {
    env::var(name).map_err(|_| PaymentError::Configuration(format!("{} not set", name)))
}

fn test_base_url() -> String {
    format!("https://checkout-test.adyen.com/{}", CHECKOUT_API_VERSION)
}

fn live_base_url(prefix: &str) -> String {
    format!(
        "https://{}-checkout-live.adyenpayments.com/checkout/{}",
        prefix, CHECKOUT_API_VERSION
    )
}
