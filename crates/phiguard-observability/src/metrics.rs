//! Metrics collection with Prometheus
//!
//! This module provides Prometheus metrics for PHI Guard:
//! - Scan counts and duration
//! - Violations detected per category
//! - Lead capture counts by source
//! - Payment counts by provider and outcome, plus settled revenue
//! - HTTP request counts and latency per endpoint

use prometheus::{Counter, CounterVec, Histogram, HistogramOpts, HistogramVec, Opts, Registry};
use std::sync::Arc;

/// Metrics collector for PHI Guard
#[derive(Clone)]
pub struct Metrics {
    /// Prometheus registry
    registry: Arc<Registry>,

    // Scan metrics
    /// Scans performed, labeled by outcome (ok, rejected, timeout)
    pub scans_total: CounterVec,
    /// Scan duration
    pub scan_duration_seconds: Histogram,
    /// Violations detected, labeled by category
    pub violations_detected_total: CounterVec,

    // Funnel metrics
    /// Leads captured, labeled by source
    pub leads_captured_total: CounterVec,

    // Payment metrics
    /// Payments initiated, labeled by provider
    pub payments_initiated_total: CounterVec,
    /// Webhook-settled payments, labeled by provider and status
    pub payments_settled_total: CounterVec,
    /// Settled revenue in USD
    pub revenue_usd_total: Counter,

    // HTTP metrics
    /// Requests received, labeled by endpoint and status class
    pub http_requests_total: CounterVec,
    /// Request duration, labeled by endpoint
    pub request_duration_seconds: HistogramVec,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let scans_total = CounterVec::new(
            Opts::new("phiguard_scans_total", "Total scans performed"),
            &["outcome"],
        )?;
        registry.register(Box::new(scans_total.clone()))?;

        let scan_duration_seconds = Histogram::with_opts(
            HistogramOpts::new("phiguard_scan_duration_seconds", "Scan duration")
                .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        )?;
        registry.register(Box::new(scan_duration_seconds.clone()))?;

        let violations_detected_total = CounterVec::new(
            Opts::new(
                "phiguard_violations_detected_total",
                "Violations detected per category",
            ),
            &["category"],
        )?;
        registry.register(Box::new(violations_detected_total.clone()))?;

        let leads_captured_total = CounterVec::new(
            Opts::new("phiguard_leads_captured_total", "Leads captured"),
            &["source"],
        )?;
        registry.register(Box::new(leads_captured_total.clone()))?;

        let payments_initiated_total = CounterVec::new(
            Opts::new("phiguard_payments_initiated_total", "Payments initiated"),
            &["provider"],
        )?;
        registry.register(Box::new(payments_initiated_total.clone()))?;

        let payments_settled_total = CounterVec::new(
            Opts::new(
                "phiguard_payments_settled_total",
                "Payments settled via webhook",
            ),
            &["provider", "status"],
        )?;
        registry.register(Box::new(payments_settled_total.clone()))?;

        let revenue_usd_total = Counter::with_opts(Opts::new(
            "phiguard_revenue_usd_total",
            "Settled revenue in USD",
        ))?;
        registry.register(Box::new(revenue_usd_total.clone()))?;

        let http_requests_total = CounterVec::new(
            Opts::new("phiguard_http_requests_total", "HTTP requests received"),
            &["endpoint", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "phiguard_request_duration_seconds",
                "HTTP request duration",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["endpoint"],
        )?;
        registry.register(Box::new(request_duration_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            scans_total,
            scan_duration_seconds,
            violations_detected_total,
            leads_captured_total,
            payments_initiated_total,
            payments_settled_total,
            revenue_usd_total,
            http_requests_total,
            request_duration_seconds,
        })
    }

    /// Access the underlying registry (for the /metrics endpoint)
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_register_without_conflicts() {
        assert!(Metrics::new().is_ok());
    }

    #[test]
    fn counters_increment() {
        let metrics = Metrics::new().unwrap();

        metrics.scans_total.with_label_values(&["ok"]).inc();
        metrics.scans_total.with_label_values(&["ok"]).inc();
        metrics
            .violations_detected_total
            .with_label_values(&["ssn"])
            .inc_by(3.0);
        metrics.revenue_usd_total.inc_by(47.0);

        assert_eq!(
            metrics.scans_total.with_label_values(&["ok"]).get(),
            2.0
        );
        assert_eq!(
            metrics
                .violations_detected_total
                .with_label_values(&["ssn"])
                .get(),
            3.0
        );
        assert_eq!(metrics.revenue_usd_total.get(), 47.0);
    }

    #[test]
    fn gather_exposes_metric_families() {
        let metrics = Metrics::new().unwrap();
        metrics.scans_total.with_label_values(&["ok"]).inc();

        let encoder = prometheus::TextEncoder::new();
        let body = encoder
            .encode_to_string(&metrics.registry().gather())
            .unwrap();
        assert!(body.contains("phiguard_scans_total"));
    }
}
