//! Shared payment types and the provider trait

use crate::plans::PlanId;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Customer details forwarded to the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// A payment to initiate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Amount in the given currency
    pub amount: f64,

    /// ISO currency code, e.g. "USD"
    pub currency: String,

    /// Plan being purchased
    pub plan: PlanId,

    /// Customer making the payment
    pub customer: CustomerInfo,
}

/// Normalized payment state across providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    /// Stable label used in stats and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }
}

/// Handle returned after initiating a payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentHandle {
    /// Our reference for the payment (tx_ref / order_id)
    pub reference: String,

    /// Provider name
    pub provider: String,

    /// Current state
    pub status: PaymentStatus,

    /// Hosted checkout URL, when the provider issues one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,

    /// Crypto deposit address, for providers that settle on-chain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_address: Option<String>,

    /// Exact amount to deposit, in `pay_currency`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_amount: Option<f64>,

    /// Settlement currency for on-chain payments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_currency: Option<String>,
}

/// Normalized webhook callback payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Our payment reference
    pub reference: String,

    /// Normalized state after the event
    pub status: PaymentStatus,

    /// Settled amount
    pub amount: f64,

    /// Settlement currency
    pub currency: String,

    /// Customer email, when the provider includes one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

/// Trait for initiating payments with a provider
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Initiate a payment and return a handle for tracking it
    async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentHandle>;

    /// Provider name used in routing, stats, and metrics
    fn name(&self) -> &'static str;
}

/// Compare two byte strings without leaking the mismatch position
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
