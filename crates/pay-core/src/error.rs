//! # Payment Error Types
//!
//! Typed error handling for the dropin-cart checkout server.
//! All processor and correlation operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Payment processor API error, carrying the processor's own status
    #[error("Provider error [{provider}] ({status}): {message}")]
    ProviderError {
        provider: String,
        status: u16,
        message: String,
        error_code: Option<String>,
    },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Redirect-return for an order reference with no continuation data
    #[error("No continuation data for order reference: {order_ref}")]
    UnknownCorrelation { order_ref: String },

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Build a provider error from an HTTP status and message
    pub fn provider(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        PaymentError::ProviderError {
            provider: provider.into(),
            status,
            message: message.into(),
            error_code: None,
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidRequest(_) => 400,
            // Relay the processor's status when it is a usable HTTP error code
            PaymentError::ProviderError { status, .. } if (400..=599).contains(status) => *status,
            PaymentError::ProviderError { .. } => 502,
            PaymentError::NetworkError(_) => 503,
            PaymentError::UnknownCorrelation { .. } => 404,
            PaymentError::Internal(_) => 500,
            PaymentError::Serialization(_) => 500,
        }
    }

    /// Processor-specific error code, if the processor supplied one
    pub fn error_code(&self) -> Option<&str> {
        match self {
            PaymentError::ProviderError { error_code, .. } => error_code.as_deref(),
            _ => None,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
