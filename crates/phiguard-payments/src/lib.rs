//! PHI Guard Payment Connectors
//!
//! This crate provides connectors to the two payment providers:
//! - Flutterwave connector (card checkout)
//! - NOWPayments connector (crypto)
//!
//! Both connectors implement [`PaymentProvider`] and verify their provider's
//! webhook callbacks before any event is trusted.

pub mod client;
pub mod flutterwave;
pub mod nowpayments;
pub mod plans;
pub mod types;

pub use flutterwave::{FlutterwaveConfig, FlutterwaveConnector};
pub use nowpayments::{NowPaymentsConfig, NowPaymentsConnector};
pub use plans::{Plan, PlanId};
pub use types::{
    CustomerInfo, PaymentHandle, PaymentProvider, PaymentRequest, PaymentStatus, WebhookEvent,
};

use thiserror::Error;

/// Payment connector error types
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Invalid connector configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Provider returned a non-success status
    #[error("Provider error ({status_code}): {message}")]
    ProviderError { status_code: u16, message: String },

    /// Provider rate limited the request
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Webhook signature did not verify
    #[error("Invalid webhook signature")]
    InvalidSignature,

    /// Plan id not in the catalog
    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    /// Request timeout
    #[error("Request timeout after {0}s")]
    Timeout(u64),

    /// Malformed provider payload
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Payment connector result type
pub type Result<T> = std::result::Result<T, PaymentError>;
