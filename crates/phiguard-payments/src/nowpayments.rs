//! NOWPayments egress connector (crypto)

use crate::client::{create_client, with_retry, HttpClientConfig};
use crate::plans::Plan;
use crate::types::{constant_time_eq, PaymentHandle, PaymentProvider, PaymentRequest, PaymentStatus, WebhookEvent};
use crate::{PaymentError, Result};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use tracing::{debug, instrument};
use uuid::Uuid;

type HmacSha512 = Hmac<Sha512>;

/// NOWPayments connector configuration
#[derive(Debug, Clone)]
pub struct NowPaymentsConfig {
    /// API key sent in the `x-api-key` header
    pub api_key: String,

    /// Secret used to verify IPN callback signatures
    pub ipn_secret: String,

    /// Base URL for the NOWPayments API (default: https://api.nowpayments.io)
    pub base_url: String,

    /// URL the provider posts IPN callbacks to
    pub ipn_callback_url: String,

    /// Crypto currency customers pay in when they don't choose one
    pub default_pay_currency: String,

    /// HTTP client configuration
    pub client_config: HttpClientConfig,
}

impl NowPaymentsConfig {
    /// Create a new NOWPayments configuration
    pub fn new(api_key: impl Into<String>, ipn_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ipn_secret: ipn_secret.into(),
            base_url: "https://api.nowpayments.io".to_string(),
            ipn_callback_url: "https://phiguard.example.com/api/crypto-webhook".to_string(),
            default_pay_currency: "btc".to_string(),
            client_config: HttpClientConfig::default(),
        }
    }

    /// Set the base URL (for custom endpoints)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the IPN callback URL
    pub fn with_ipn_callback_url(mut self, url: impl Into<String>) -> Self {
        self.ipn_callback_url = url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct NowPaymentsBody<'a> {
    price_amount: f64,
    price_currency: &'a str,
    pay_currency: &'a str,
    ipn_callback_url: &'a str,
    order_id: String,
    order_description: &'a str,
    is_fixed_rate: bool,
    is_fee_paid_by_user: bool,
}

#[derive(Debug, Deserialize)]
struct NowPaymentsResponse {
    #[serde(default)]
    pay_address: Option<String>,
    #[serde(default)]
    pay_amount: Option<f64>,
    #[serde(default)]
    pay_currency: Option<String>,
}

/// Raw IPN callback payload posted by NOWPayments
#[derive(Debug, Clone, Deserialize)]
pub struct NowPaymentsIpn {
    pub order_id: String,
    pub payment_status: String,
    pub price_amount: f64,
    pub price_currency: String,
    #[serde(default)]
    pub pay_currency: Option<String>,
}

/// NOWPayments connector
pub struct NowPaymentsConnector {
    config: NowPaymentsConfig,
    client: Client,
}

impl NowPaymentsConnector {
    /// Create a new NOWPayments connector
    pub fn new(config: NowPaymentsConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(PaymentError::ConfigError(
                "NOWPayments API key is required".to_string(),
            ));
        }
        let client = create_client(&config.client_config)?;
        Ok(Self { config, client })
    }

    /// Verify an IPN callback signature
    ///
    /// The signature is HMAC-SHA512 over the JSON body with its keys sorted.
    /// serde_json's default map is ordered, so re-serializing the parsed body
    /// yields exactly that canonical form.
    pub fn verify_ipn(&self, body: &serde_json::Value, signature: Option<&str>) -> bool {
        let Some(sig) = signature else {
            return false;
        };

        let canonical = match serde_json::to_string(body) {
            Ok(c) => c,
            Err(_) => return false,
        };

        let mut mac = match HmacSha512::new_from_slice(self.config.ipn_secret.as_bytes()) {
            Ok(m) => m,
            Err(_) => return false,
        };
        mac.update(canonical.as_bytes());
        let expected = hex_encode(&mac.finalize().into_bytes());

        constant_time_eq(expected.as_bytes(), sig.to_lowercase().as_bytes())
    }

    /// Parse a verified IPN body into a normalized event
    pub fn parse_ipn(&self, body: &serde_json::Value) -> Result<WebhookEvent> {
        let ipn: NowPaymentsIpn = serde_json::from_value(body.clone())?;

        let status = match ipn.payment_status.as_str() {
            "finished" => PaymentStatus::Completed,
            "failed" | "refunded" | "expired" => PaymentStatus::Failed,
            _ => PaymentStatus::Pending,
        };

        Ok(WebhookEvent {
            reference: ipn.order_id,
            status,
            amount: ipn.price_amount,
            currency: ipn.price_currency,
            customer_email: None,
        })
    }

    async fn handle_response(&self, response: reqwest::Response) -> Result<NowPaymentsResponse> {
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
impl PaymentProvider for NowPaymentsConnector {
    #[instrument(skip(self, request), fields(plan = request.plan.as_str()))]
    async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentHandle> {
        let plan = Plan::get(request.plan);
        let order_id = Uuid::new_v4().to_string();

        debug!("Initiating NOWPayments payment {}", order_id);

        let max_retries = self.config.client_config.max_retries;
        let response = with_retry(max_retries, || {
            let body = NowPaymentsBody {
                price_amount: request.amount,
                price_currency: &request.currency,
                pay_currency: &self.config.default_pay_currency,
                ipn_callback_url: &self.config.ipn_callback_url,
                order_id: order_id.clone(),
                order_description: plan.name,
                is_fixed_rate: true,
                is_fee_paid_by_user: true,
            };
            async move {
                let response = self
                    .client
                    .post(format!("{}/v1/payment", self.config.base_url))
                    .header("x-api-key", &self.config.api_key)
                    .header("Content-Type", "application/json")
                    .json(&body)
                    .send()
                    .await?;

                self.handle_response(response).await
            }
        })
        .await?;

        Ok(PaymentHandle {
            reference: order_id,
            provider: self.name().to_string(),
            status: PaymentStatus::Pending,
            checkout_url: None,
            pay_address: response.pay_address,
            pay_amount: response.pay_amount,
            pay_currency: response.pay_currency,
        })
    }

    fn name(&self) -> &'static str {
        "nowpayments"
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::PlanId;
    use crate::types::CustomerInfo;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> NowPaymentsConfig {
        NowPaymentsConfig::new("np_test_key", "ipn_secret").with_base_url(base_url)
    }

    fn test_request() -> PaymentRequest {
        PaymentRequest {
            amount: 197.0,
            currency: "USD".to_string(),
            plan: PlanId::Monthly,
            customer: CustomerInfo {
                email: "buyer@example.com".to_string(),
                name: None,
                phone_number: None,
            },
        }
    }

    fn sign(secret: &str, body: &serde_json::Value) -> String {
        let canonical = serde_json::to_string(body).unwrap();
        let mut mac = HmacSha512::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(canonical.as_bytes());
        hex_encode(&mac.finalize().into_bytes())
    }

    #[test]
    fn rejects_empty_api_key() {
        let config = NowPaymentsConfig::new("", "secret");
        assert!(NowPaymentsConnector::new(config).is_err());
    }

    #[tokio::test]
    async fn create_payment_returns_deposit_details() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment"))
            .and(header("x-api-key", "np_test_key"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "payment_id": "5077125051",
                "payment_status": "waiting",
                "pay_address": "3EZ2uTdVDAMFXTfc6uLDDKR6o8qKBZXVkj",
                "pay_amount": 0.0031,
                "pay_currency": "btc"
            })))
            .mount(&server)
            .await;

        let connector = NowPaymentsConnector::new(test_config(server.uri())).unwrap();
        let handle = connector.create_payment(&test_request()).await.unwrap();

        assert_eq!(handle.provider, "nowpayments");
        assert_eq!(handle.status, PaymentStatus::Pending);
        assert_eq!(
            handle.pay_address.as_deref(),
            Some("3EZ2uTdVDAMFXTfc6uLDDKR6o8qKBZXVkj")
        );
        assert_eq!(handle.pay_amount, Some(0.0031));
        assert_eq!(handle.pay_currency.as_deref(), Some("btc"));
        assert!(handle.checkout_url.is_none());
    }

    #[tokio::test]
    async fn create_payment_maps_provider_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment"))
            .respond_with(ResponseTemplate::new(403).set_body_string("bad key"))
            .mount(&server)
            .await;

        let connector = NowPaymentsConnector::new(test_config(server.uri())).unwrap();
        let err = connector.create_payment(&test_request()).await.unwrap_err();
        assert!(matches!(
            err,
            PaymentError::ProviderError { status_code: 403, .. }
        ));
    }

    #[test]
    fn ipn_signature_verifies() {
        let connector =
            NowPaymentsConnector::new(test_config("https://api.nowpayments.io".into())).unwrap();

        let body = json!({
            "order_id": "ord-1",
            "payment_status": "finished",
            "price_amount": 197.0,
            "price_currency": "usd"
        });
        let sig = sign("ipn_secret", &body);

        assert!(connector.verify_ipn(&body, Some(&sig)));
        assert!(connector.verify_ipn(&body, Some(&sig.to_uppercase())));
        assert!(!connector.verify_ipn(&body, None));
    }

    #[test]
    fn ipn_signature_rejects_tampered_body() {
        let connector =
            NowPaymentsConnector::new(test_config("https://api.nowpayments.io".into())).unwrap();

        let body = json!({
            "order_id": "ord-1",
            "payment_status": "finished",
            "price_amount": 197.0,
            "price_currency": "usd"
        });
        let sig = sign("ipn_secret", &body);

        let mut tampered = body.clone();
        tampered["price_amount"] = json!(1.0);

        assert!(!connector.verify_ipn(&tampered, Some(&sig)));
    }

    #[test]
    fn ipn_signature_is_key_order_independent() {
        let connector =
            NowPaymentsConnector::new(test_config("https://api.nowpayments.io".into())).unwrap();

        // Same fields, declared in a different order: the canonical form is
        // identical, so the signature still verifies.
        let body_a = json!({
            "order_id": "ord-1",
            "payment_status": "finished",
            "price_amount": 197.0,
            "price_currency": "usd"
        });
        let body_b = json!({
            "price_currency": "usd",
            "price_amount": 197.0,
            "payment_status": "finished",
            "order_id": "ord-1"
        });

        let sig = sign("ipn_secret", &body_a);
        assert!(connector.verify_ipn(&body_b, Some(&sig)));
    }

    #[test]
    fn parse_ipn_normalizes_statuses() {
        let connector =
            NowPaymentsConnector::new(test_config("https://api.nowpayments.io".into())).unwrap();

        let finished = json!({
            "order_id": "ord-1",
            "payment_status": "finished",
            "price_amount": 47.0,
            "price_currency": "usd"
        });
        let event = connector.parse_ipn(&finished).unwrap();
        assert_eq!(event.status, PaymentStatus::Completed);
        assert_eq!(event.reference, "ord-1");

        let failed = json!({
            "order_id": "ord-2",
            "payment_status": "failed",
            "price_amount": 47.0,
            "price_currency": "usd"
        });
        assert_eq!(
            connector.parse_ipn(&failed).unwrap().status,
            PaymentStatus::Failed
        );

        let waiting = json!({
            "order_id": "ord-3",
            "payment_status": "confirming",
            "price_amount": 47.0,
            "price_currency": "usd"
        });
        assert_eq!(
            connector.parse_ipn(&waiting).unwrap().status,
            PaymentStatus::Pending
        );
    }

    #[test]
    fn hex_encoding() {
        assert_eq!(hex_encode(&[0x00, 0xff, 0x10]), "00ff10");
    }
}
