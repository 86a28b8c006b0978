//! HTTP API routes
//!
//! Every route lives under `/api`, mirroring the JSON contract the frontend
//! consumes. Errors serialize into a single envelope shape; webhook routes
//! verify their provider's signature before trusting anything in the body.

use crate::stats::FunnelStats;
use axum::{
    extract::{MatchedPath, Path, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use phiguard_core::{LeadContact, ScanSummary};
use phiguard_observability::Metrics;
use phiguard_outreach::{
    email_sequence, linkedin_sequence, nurture_sequence, NurtureSink, OutreachPlan,
    OutreachSettings, Prospect,
};
use phiguard_payments::{
    CustomerInfo, FlutterwaveConnector, NowPaymentsConnector, PaymentError, PaymentProvider,
    PaymentStatus, PlanId,
};
use phiguard_scanner::{PhiScanner, ScanError, ScanResult};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

/// Shared state injected into every route
#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<PhiScanner>,
    pub scan_timeout: Duration,
    pub stats: Arc<FunnelStats>,
    pub metrics: Arc<Metrics>,
    pub flutterwave: Option<Arc<FlutterwaveConnector>>,
    pub nowpayments: Option<Arc<NowPaymentsConnector>>,
    pub outreach: OutreachSettings,
    pub nurture: Arc<dyn NurtureSink>,
    pub started_at: Instant,
}

/// Default nurture sink: builds the drip and logs its schedule
///
/// Delivery is out of scope for the backend; a mail transport would slot in
/// behind the same trait.
pub struct SequenceLogger {
    pub settings: OutreachSettings,
}

impl NurtureSink for SequenceLogger {
    fn enqueue(&self, contact: &LeadContact, summary: &ScanSummary) {
        let plan = nurture_sequence(contact, summary, &self.settings);
        log_outreach_plan("nurture", &plan);
    }
}

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request format
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Webhook signature failed verification
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Scan input exceeded the configured limit
    #[error("Input too large: {0} bytes")]
    PayloadTooLarge(usize),

    /// Scan exceeded its wall-clock budget
    #[error("Scan timed out")]
    ScanTimeout,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::UnknownPlan(plan) => {
                ApiError::InvalidRequest(format!("Unknown plan: {plan}"))
            }
            PaymentError::InvalidSignature => {
                ApiError::Unauthorized("Invalid webhook signature".to_string())
            }
            PaymentError::Serialization(e) => {
                ApiError::InvalidRequest(format!("Malformed payload: {e}"))
            }
            other => ApiError::Internal(format!("Payment processing failed: {other}")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request_error", msg)
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "authentication_error", msg),
            ApiError::PayloadTooLarge(size) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "invalid_request_error",
                format!("Input too large: {size} bytes"),
            ),
            ApiError::ScanTimeout => (
                StatusCode::REQUEST_TIMEOUT,
                "timeout_error",
                "Scan timed out".to_string(),
            ),
            ApiError::Serialization(err) => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                format!("Serialization error: {err}"),
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "api_error", msg),
        };

        let body = json!({
            "error": {
                "message": message,
                "type": error_type,
                "code": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// Build the `/api` router
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(api_index))
        .route("/api/scan", post(scan))
        .route("/api/capture-lead", post(capture_lead))
        .route("/api/dashboard", get(dashboard))
        .route("/api/analytics", get(analytics))
        .route("/api/process-payment", post(process_payment))
        .route("/api/payment-webhook", post(payment_webhook))
        .route("/api/crypto-webhook", post(crypto_webhook))
        .route("/api/payment-status/{id}", get(payment_status))
        .route("/api/trigger-marketing", post(trigger_marketing))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            track_requests,
        ))
        .with_state(state)
}

/// Request accounting middleware
async fn track_requests(
    State(state): State<AppState>,
    matched_path: Option<MatchedPath>,
    request: Request,
    next: Next,
) -> Response {
    let endpoint = matched_path
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    state.stats.record_request(status.is_client_error() || status.is_server_error());
    state
        .metrics
        .http_requests_total
        .with_label_values(&[&endpoint, status.as_str()])
        .inc();
    state
        .metrics
        .request_duration_seconds
        .with_label_values(&[&endpoint])
        .observe(start.elapsed().as_secs_f64());

    response
}

async fn api_index(State(state): State<AppState>) -> Json<serde_json::Value> {
    let revenue = state.stats.revenue_snapshot();
    Json(json!({
        "message": "HIPAA Guard AI - Compliance Scanner API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "active",
        "revenue": format!("${:.2}", revenue.total_revenue),
        "leads": state.stats.total_leads(),
    }))
}

#[derive(Debug, Deserialize)]
struct ScanRequest {
    text: String,
}

/// Scan user-submitted text for PHI patterns
async fn scan(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> ApiResult<Json<ScanResult>> {
    let start = Instant::now();
    let scanner = state.scanner.clone();
    let text = request.text;

    // The scan itself is pure CPU; run it off the async worker and bound it
    // with the configured wall-clock budget.
    let handle = tokio::task::spawn_blocking(move || scanner.scan(&text));
    let joined = tokio::time::timeout(state.scan_timeout, handle)
        .await
        .map_err(|_| {
            state
                .metrics
                .scans_total
                .with_label_values(&["timeout"])
                .inc();
            ApiError::ScanTimeout
        })?
        .map_err(|e| ApiError::Internal(format!("Scan task failed: {e}")))?;

    match joined {
        Ok(result) => {
            state.metrics.scans_total.with_label_values(&["ok"]).inc();
            state
                .metrics
                .scan_duration_seconds
                .observe(start.elapsed().as_secs_f64());
            for finding in &result.violations {
                state
                    .metrics
                    .violations_detected_total
                    .with_label_values(&[finding.category.as_str()])
                    .inc_by(finding.occurrence_count as f64);
            }
            Ok(Json(result))
        }
        Err(ScanError::InputTooLarge { actual, limit }) => {
            state
                .metrics
                .scans_total
                .with_label_values(&["rejected"])
                .inc();
            warn!("Rejected oversized scan input: {} bytes (limit {})", actual, limit);
            Err(ApiError::PayloadTooLarge(actual))
        }
    }
}

#[derive(Debug, Deserialize)]
struct CaptureLeadRequest {
    #[serde(flatten)]
    contact: LeadContact,

    /// Scan summary attached when the lead came through the scanner funnel
    scan_summary: Option<ScanSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CaptureLeadResponse {
    success: bool,
    lead_id: String,
    message: String,
}

/// Capture a lead and queue its nurture sequence
async fn capture_lead(
    State(state): State<AppState>,
    Json(request): Json<CaptureLeadRequest>,
) -> ApiResult<Json<CaptureLeadResponse>> {
    if request.contact.email.is_empty() {
        return Err(ApiError::InvalidRequest("email is required".to_string()));
    }

    let lead_id = state.stats.record_lead(&request.contact);
    state
        .metrics
        .leads_captured_total
        .with_label_values(&[request.contact.source.as_str()])
        .inc();

    info!(
        "New lead captured: {} from {}",
        request.contact.email,
        request.contact.source.as_str()
    );

    if let Some(summary) = &request.scan_summary {
        state.nurture.enqueue(&request.contact, summary);
    }

    Ok(Json(CaptureLeadResponse {
        success: true,
        lead_id,
        message: "Lead captured successfully".to_string(),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PerformanceSnapshot {
    uptime_seconds: u64,
    requests: u64,
    errors: u64,
    error_rate: f64,
}

fn performance_snapshot(state: &AppState) -> PerformanceSnapshot {
    let requests = state.stats.requests();
    let errors = state.stats.errors();
    PerformanceSnapshot {
        uptime_seconds: state.started_at.elapsed().as_secs(),
        requests,
        errors,
        error_rate: if requests == 0 {
            0.0
        } else {
            errors as f64 / requests as f64 * 100.0
        },
    }
}

/// Funnel dashboard snapshot
async fn dashboard(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "revenue": state.stats.revenue_snapshot(),
        "leads": state.stats.lead_snapshot(),
        "performance": performance_snapshot(&state),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Marketing analytics rollup with revenue projections
async fn analytics(State(state): State<AppState>) -> Json<serde_json::Value> {
    let revenue = state.stats.revenue_snapshot();
    let leads = state.stats.lead_snapshot();

    Json(json!({
        "revenue": {
            "total": revenue.total_revenue,
            "monthly": revenue.monthly_revenue,
            "averageOrder": revenue.average_order_value,
            "transactions": revenue.total_transactions,
            "conversionRate": revenue.conversion_rate,
        },
        "leads": {
            "total": leads.total_leads,
            "monthly": leads.monthly_leads,
            "sources": leads.sources,
        },
        "performance": performance_snapshot(&state),
        "projections": {
            "dailyRevenue": revenue.monthly_revenue / 30.0,
            "yearlyProjection": revenue.monthly_revenue * 12.0 * 1.2,
        },
    }))
}

#[derive(Debug, Deserialize)]
struct ProcessPaymentRequest {
    method: String,
    amount: f64,
    currency: String,
    plan: String,
    #[serde(rename = "customerInfo")]
    customer_info: CustomerInfo,
}

/// Initiate a payment with the requested provider
async fn process_payment(
    State(state): State<AppState>,
    Json(request): Json<ProcessPaymentRequest>,
) -> ApiResult<Response> {
    if request.amount <= 0.0 {
        return Err(ApiError::InvalidRequest(
            "amount must be positive".to_string(),
        ));
    }

    let plan = PlanId::parse(&request.plan)?;
    let payment_request = phiguard_payments::PaymentRequest {
        amount: request.amount,
        currency: request.currency,
        plan,
        customer: request.customer_info,
    };

    info!(
        "Payment attempt: ${} via {} for plan: {}",
        request.amount,
        request.method,
        plan.as_str()
    );

    let provider: Arc<dyn PaymentProvider> = match request.method.as_str() {
        "flutterwave" => state
            .flutterwave
            .clone()
            .map(|c| c as Arc<dyn PaymentProvider>)
            .ok_or_else(|| {
                ApiError::InvalidRequest("Flutterwave is not configured".to_string())
            })?,
        "crypto" => state
            .nowpayments
            .clone()
            .map(|c| c as Arc<dyn PaymentProvider>)
            .ok_or_else(|| {
                ApiError::InvalidRequest("Crypto payments are not configured".to_string())
            })?,
        _ => return Err(ApiError::InvalidRequest("Invalid payment method".to_string())),
    };

    let handle = provider.create_payment(&payment_request).await?;
    state
        .metrics
        .payments_initiated_total
        .with_label_values(&[provider.name()])
        .inc();

    Ok(Json(handle).into_response())
}

/// Flutterwave webhook callback
async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<Json<serde_json::Value>> {
    let connector = state
        .flutterwave
        .as_ref()
        .ok_or_else(|| ApiError::InvalidRequest("Flutterwave is not configured".to_string()))?;

    let signature = headers.get("verif-hash").and_then(|v| v.to_str().ok());
    if !connector.verify_webhook(signature) {
        return Err(ApiError::Unauthorized(
            "Invalid webhook signature".to_string(),
        ));
    }

    if let Some(event) = connector.parse_webhook(&body)? {
        match event.status {
            PaymentStatus::Completed => {
                info!(
                    "Payment completed: ${} from {}",
                    event.amount,
                    event.customer_email.as_deref().unwrap_or("unknown")
                );
                state.stats.record_transaction(
                    event.reference,
                    event.amount,
                    event.currency,
                    event.customer_email,
                    "flutterwave",
                );
                state
                    .metrics
                    .payments_settled_total
                    .with_label_values(&["flutterwave", "completed"])
                    .inc();
                state.metrics.revenue_usd_total.inc_by(event.amount);
            }
            PaymentStatus::Failed => {
                warn!("Payment failed: {}", event.reference);
                state
                    .metrics
                    .payments_settled_total
                    .with_label_values(&["flutterwave", "failed"])
                    .inc();
            }
            PaymentStatus::Pending => {}
        }
    }

    Ok(Json(json!({ "received": true })))
}

/// NOWPayments IPN callback
async fn crypto_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<Json<serde_json::Value>> {
    let connector = state
        .nowpayments
        .as_ref()
        .ok_or_else(|| ApiError::InvalidRequest("Crypto payments are not configured".to_string()))?;

    let signature = headers
        .get("x-nowpayments-sig")
        .and_then(|v| v.to_str().ok());
    if !connector.verify_ipn(&body, signature) {
        return Err(ApiError::Unauthorized(
            "Invalid IPN signature".to_string(),
        ));
    }

    let event = connector.parse_ipn(&body)?;
    match event.status {
        PaymentStatus::Completed => {
            info!("Crypto payment completed: ${}", event.amount);
            state.stats.record_transaction(
                event.reference,
                event.amount,
                event.currency,
                None,
                "crypto",
            );
            state
                .metrics
                .payments_settled_total
                .with_label_values(&["nowpayments", "completed"])
                .inc();
            state.metrics.revenue_usd_total.inc_by(event.amount);
        }
        PaymentStatus::Failed => {
            warn!("Crypto payment failed: {}", event.reference);
            state
                .metrics
                .payments_settled_total
                .with_label_values(&["nowpayments", "failed"])
                .inc();
        }
        PaymentStatus::Pending => {}
    }

    Ok(Json(json!({ "received": true })))
}

/// Check the status of a recent payment
async fn payment_status(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> Json<serde_json::Value> {
    match state.stats.find_transaction(&payment_id) {
        Some(transaction) => Json(json!({
            "status": transaction.status,
            "amount": transaction.amount,
            "currency": transaction.currency,
            "timestamp": transaction.timestamp,
        })),
        None => Json(json!({ "status": "not_found" })),
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum MarketingTrigger {
    LinkedinOutreach { prospect: Prospect },
    EmailSequence { prospect: Prospect },
    FollowUp { contact: LeadContact, summary: ScanSummary },
}

#[derive(Debug, Serialize)]
struct MarketingResponse {
    success: bool,
    message: String,
    steps: usize,
}

/// Build and queue an outreach sequence
async fn trigger_marketing(
    State(state): State<AppState>,
    Json(trigger): Json<MarketingTrigger>,
) -> ApiResult<Json<MarketingResponse>> {
    let (kind, plan) = match &trigger {
        MarketingTrigger::LinkedinOutreach { prospect } => (
            "linkedin_outreach",
            linkedin_sequence(prospect, &state.outreach),
        ),
        MarketingTrigger::EmailSequence { prospect } => {
            ("email_sequence", email_sequence(prospect, &state.outreach))
        }
        MarketingTrigger::FollowUp { contact, summary } => {
            ("follow_up", nurture_sequence(contact, summary, &state.outreach))
        }
    };

    log_outreach_plan(kind, &plan);

    Ok(Json(MarketingResponse {
        success: true,
        message: format!("{kind} triggered successfully"),
        steps: plan.steps.len(),
    }))
}

fn log_outreach_plan(kind: &str, plan: &OutreachPlan) {
    info!(
        "{} sequence scheduled for {} ({} steps)",
        kind,
        plan.recipient,
        plan.steps.len()
    );
    for step in &plan.steps {
        info!(
            "  day {}: {:?} via {:?}",
            step.day_offset, step.condition, step.channel
        );
    }
}

/// JSON 404 handler
async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "message": "The requested resource was not found",
        })),
    )
        .into_response()
}
