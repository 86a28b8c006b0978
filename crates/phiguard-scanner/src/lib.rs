//! PHI Guard detection and risk scoring
//!
//! This crate provides the PHI scanning engine:
//! - Ordered pattern table (SSN, phone, email, DOB, MRN, insurance, address, credit card)
//! - Per-category redaction with fixed placeholder tokens
//! - Compliance scoring, risk classification, and fine exposure estimates
//!
//! Matching runs on the `regex` crate's finite-automaton engine, so scan cost
//! is linear in the input even for adversarial text.

pub mod report;
pub mod rules;
pub mod scanner;

pub use report::{RiskLevel, ScanResult, ViolationFinding};
pub use rules::{pattern_table, PatternRule, PhiCategory, Severity};
pub use scanner::{PhiScanner, ScanError, ScannerConfig};
