//! PHI Guard Observability
//!
//! This crate provides observability features:
//! - Metrics collection (Prometheus)
//! - Health endpoints

pub mod health;
pub mod metrics;

pub use health::{health_router, HealthState, ProviderStatus, ReadinessChecker};
pub use metrics::Metrics;
