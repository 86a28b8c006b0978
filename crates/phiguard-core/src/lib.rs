//! PHI Guard Core Types
//!
//! This crate provides the types shared across the PHI Guard workspace:
//! - Lead and scan-summary types exchanged with the funnel
//! - Core error types
//! - Template variable substitution for outreach content

pub mod error;
pub mod lead;
pub mod template;

pub use error::{Error, Result};
pub use lead::{LeadContact, LeadSource, ScanSummary};
