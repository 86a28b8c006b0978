//! Flutterwave egress connector

use crate::client::{create_client, with_retry, HttpClientConfig};
use crate::plans::Plan;
use crate::types::{constant_time_eq, PaymentHandle, PaymentProvider, PaymentRequest, PaymentStatus, WebhookEvent};
use crate::{PaymentError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

/// Flutterwave connector configuration
#[derive(Debug, Clone)]
pub struct FlutterwaveConfig {
    /// Secret API key for authentication
    pub secret_key: String,

    /// Shared secret compared against the webhook `verif-hash` header
    pub secret_hash: String,

    /// Base URL for the Flutterwave API (default: https://api.flutterwave.com)
    pub base_url: String,

    /// URL the customer is sent to after checkout
    pub redirect_url: String,

    /// HTTP client configuration
    pub client_config: HttpClientConfig,
}

impl FlutterwaveConfig {
    /// Create a new Flutterwave configuration
    pub fn new(secret_key: impl Into<String>, secret_hash: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            secret_hash: secret_hash.into(),
            base_url: "https://api.flutterwave.com".to_string(),
            redirect_url: "https://phiguard.example.com/payment-callback".to_string(),
            client_config: HttpClientConfig::default(),
        }
    }

    /// Set the base URL (for custom endpoints)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the post-checkout redirect URL
    pub fn with_redirect_url(mut self, redirect_url: impl Into<String>) -> Self {
        self.redirect_url = redirect_url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct FlutterwavePaymentBody<'a> {
    amount: f64,
    currency: &'a str,
    customer: &'a crate::types::CustomerInfo,
    tx_ref: String,
    redirect_url: &'a str,
    payment_plan: &'a str,
    customizations: Customizations<'a>,
}

#[derive(Debug, Serialize)]
struct Customizations<'a> {
    title: &'static str,
    description: &'a str,
}

#[derive(Debug, Deserialize)]
struct FlutterwaveResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<FlutterwaveResponseData>,
}

#[derive(Debug, Deserialize)]
struct FlutterwaveResponseData {
    link: Option<String>,
}

/// Raw webhook payload posted by Flutterwave
#[derive(Debug, Clone, Deserialize)]
pub struct FlutterwaveWebhook {
    pub event: String,
    pub data: FlutterwaveWebhookData,
}

/// Charge details inside a webhook payload
#[derive(Debug, Clone, Deserialize)]
pub struct FlutterwaveWebhookData {
    pub tx_ref: String,
    pub status: String,
    pub amount: f64,
    pub currency: String,
    #[serde(default)]
    pub customer: Option<FlutterwaveWebhookCustomer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlutterwaveWebhookCustomer {
    pub email: String,
}

/// Flutterwave connector
pub struct FlutterwaveConnector {
    config: FlutterwaveConfig,
    client: Client,
}

impl FlutterwaveConnector {
    /// Create a new Flutterwave connector
    pub fn new(config: FlutterwaveConfig) -> Result<Self> {
        if config.secret_key.is_empty() {
            return Err(PaymentError::ConfigError(
                "Flutterwave secret key is required".to_string(),
            ));
        }
        let client = create_client(&config.client_config)?;
        Ok(Self { config, client })
    }

    /// Verify a webhook's `verif-hash` header against the configured secret
    pub fn verify_webhook(&self, signature: Option<&str>) -> bool {
        match signature {
            Some(sig) => constant_time_eq(sig.as_bytes(), self.config.secret_hash.as_bytes()),
            None => false,
        }
    }

    /// Parse a verified webhook body into a normalized event
    ///
    /// Only completed charges produce an event; other event types return
    /// `None` and are the caller's to log.
    pub fn parse_webhook(&self, body: &serde_json::Value) -> Result<Option<WebhookEvent>> {
        let webhook: FlutterwaveWebhook = serde_json::from_value(body.clone())?;

        let status = match (webhook.event.as_str(), webhook.data.status.as_str()) {
            ("charge.completed", "successful") => PaymentStatus::Completed,
            ("charge.completed", _) => PaymentStatus::Pending,
            ("charge.failed", _) => PaymentStatus::Failed,
            _ => return Ok(None),
        };

        Ok(Some(WebhookEvent {
            reference: webhook.data.tx_ref,
            status,
            amount: webhook.data.amount,
            currency: webhook.data.currency,
            customer_email: webhook.data.customer.map(|c| c.email),
        }))
    }

    async fn handle_response(&self, response: reqwest::Response) -> Result<FlutterwaveResponse> {
        let status = response.status();

        if !status.is_success() {
            let status_code = status.as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            return Err(if status_code == 429 {
                PaymentError::RateLimitExceeded
            } else {
                PaymentError::ProviderError {
                    status_code,
                    message: body,
                }
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl PaymentProvider for FlutterwaveConnector {
    #[instrument(skip(self, request), fields(plan = request.plan.as_str()))]
    async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentHandle> {
        let plan = Plan::get(request.plan);
        let tx_ref = format!("hipaa-guard-{}", Uuid::new_v4());

        debug!("Initiating Flutterwave payment {}", tx_ref);

        let max_retries = self.config.client_config.max_retries;
        let response = with_retry(max_retries, || {
            let body = FlutterwavePaymentBody {
                amount: request.amount,
                currency: &request.currency,
                customer: &request.customer,
                tx_ref: tx_ref.clone(),
                redirect_url: &self.config.redirect_url,
                payment_plan: request.plan.as_str(),
                customizations: Customizations {
                    title: "HIPAA Guard AI",
                    description: plan.name,
                },
            };
            async move {
                let response = self
                    .client
                    .post(format!("{}/v3/payments", self.config.base_url))
                    .header("Authorization", format!("Bearer {}", self.config.secret_key))
                    .header("Content-Type", "application/json")
                    .json(&body)
                    .send()
                    .await?;

                self.handle_response(response).await
            }
        })
        .await?;

        if response.status != "success" {
            return Err(PaymentError::ProviderError {
                status_code: 200,
                message: response
                    .message
                    .unwrap_or_else(|| "payment initiation rejected".to_string()),
            });
        }

        Ok(PaymentHandle {
            reference: tx_ref,
            provider: self.name().to_string(),
            status: PaymentStatus::Pending,
            checkout_url: response.data.and_then(|d| d.link),
            pay_address: None,
            pay_amount: None,
            pay_currency: None,
        })
    }

    fn name(&self) -> &'static str {
        "flutterwave"
    }
}
