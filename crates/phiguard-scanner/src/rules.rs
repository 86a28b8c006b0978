//! The PHI pattern table
//!
//! Rules are evaluated in a fixed order. The order matters: it determines both
//! the sequence of redaction passes and the order of findings in a scan
//! result, so changing it is a breaking change for downstream consumers.

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// PHI categories the scanner can detect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhiCategory {
    /// Social Security Number
    Ssn,

    /// Phone number
    Phone,

    /// Email address
    Email,

    /// Date of birth
    DateOfBirth,

    /// Medical record number (labeled)
    MedicalRecordNumber,

    /// Insurance or policy number (labeled)
    InsuranceNumber,

    /// Street address
    StreetAddress,

    /// Credit card number
    CreditCard,
}

impl PhiCategory {
    /// Human-readable description of the category
    pub fn display_name(&self) -> &'static str {
        match self {
            PhiCategory::Ssn => "Social Security Number",
            PhiCategory::Phone => "Phone Number",
            PhiCategory::Email => "Email Address",
            PhiCategory::DateOfBirth => "Date of Birth",
            PhiCategory::MedicalRecordNumber => "Medical Record Number",
            PhiCategory::InsuranceNumber => "Insurance Number",
            PhiCategory::StreetAddress => "Street Address",
            PhiCategory::CreditCard => "Credit Card Number",
        }
    }

    /// Stable label used in stats and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            PhiCategory::Ssn => "ssn",
            PhiCategory::Phone => "phone",
            PhiCategory::Email => "email",
            PhiCategory::DateOfBirth => "date_of_birth",
            PhiCategory::MedicalRecordNumber => "medical_record_number",
            PhiCategory::InsuranceNumber => "insurance_number",
            PhiCategory::StreetAddress => "street_address",
            PhiCategory::CreditCard => "credit_card",
        }
    }

    /// Placeholder token substituted for every match of this category
    pub fn placeholder(&self) -> &'static str {
        match self {
            PhiCategory::Ssn => "[SSN_REDACTED]",
            PhiCategory::Phone => "[PHONE_REDACTED]",
            PhiCategory::Email => "[EMAIL_REDACTED]",
            PhiCategory::DateOfBirth => "[DOB_REDACTED]",
            PhiCategory::MedicalRecordNumber => "[MRN_REDACTED]",
            PhiCategory::InsuranceNumber => "[INSURANCE_REDACTED]",
            PhiCategory::StreetAddress => "[ADDRESS_REDACTED]",
            PhiCategory::CreditCard => "[CREDIT_CARD_REDACTED]",
        }
    }
}

/// Severity of a PHI category, fixed per category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
}

impl Severity {
    /// Base fine estimate in USD for a single occurrence
    pub fn base_fine(&self) -> u64 {
        match self {
            Severity::Critical => 50_000,
            Severity::High => 25_000,
            Severity::Medium => 10_000,
        }
    }

    /// Weight this severity contributes to the urgency score
    pub fn urgency_weight(&self) -> u32 {
        match self {
            Severity::Critical => 3,
            Severity::High => 2,
            Severity::Medium => 0,
        }
    }
}

/// A single detection rule: category, severity, and the compiled matcher
pub struct PatternRule {
    /// Category this rule detects
    pub category: PhiCategory,

    /// Fixed severity for the category
    pub severity: Severity,

    /// Compiled matcher, run independently per rule
    pub matcher: Regex,

    // Label-anchored rules carry a keyword prefilter so the regex pass can be
    // skipped entirely when none of the labels occur in the input.
    prefilter: Option<AhoCorasick>,
}

impl PatternRule {
    fn new(category: PhiCategory, severity: Severity, pattern: &str) -> Self {
        Self {
            category,
            severity,
            matcher: Regex::new(pattern).unwrap(),
            prefilter: None,
        }
    }

    fn with_prefilter(mut self, keywords: &[&str]) -> Self {
        self.prefilter = Some(
            AhoCorasick::builder()
                .ascii_case_insensitive(true)
                .build(keywords)
                .unwrap(),
        );
        self
    }

    /// Whether this rule can possibly match the given text
    ///
    /// A `false` here is definitive: the prefilter keywords are required
    /// substrings of every match the regex can produce.
    pub fn applies_to(&self, text: &str) -> bool {
        match &self.prefilter {
            Some(ac) => ac.is_match(text),
            None => true,
        }
    }
}

static PATTERN_TABLE: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    vec![
        PatternRule::new(
            PhiCategory::Ssn,
            Severity::Critical,
            r"\b\d{3}[-\s]?\d{2}[-\s]?\d{4}\b",
        ),
        PatternRule::new(
            PhiCategory::Phone,
            Severity::High,
            r"\(?\b\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b",
        ),
        PatternRule::new(
            PhiCategory::Email,
            Severity::High,
            r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
        ),
        PatternRule::new(
            PhiCategory::DateOfBirth,
            Severity::Critical,
            r"\b(?:0?[1-9]|1[0-2])[/-](?:0?[1-9]|[12][0-9]|3[01])[/-](?:19|20)\d{2}\b",
        ),
        PatternRule::new(
            PhiCategory::MedicalRecordNumber,
            Severity::Critical,
            r"(?i)\b(?:mrn|medical record(?:\s+(?:number|no\.?))?|patient id)\s*[:#]?\s*\d+",
        )
        .with_prefilter(&["mrn", "medical record", "patient id"]),
        PatternRule::new(
            PhiCategory::InsuranceNumber,
            Severity::High,
            r"(?i)\b(?:insurance|policy)(?:\s+(?:number|no\.?|id))?\s*[:#]?\s*[A-Za-z]{0,4}-?\d[A-Za-z0-9-]{3,}\b",
        )
        .with_prefilter(&["insurance", "policy"]),
        PatternRule::new(
            PhiCategory::StreetAddress,
            Severity::Medium,
            r"(?i)\b\d+\s+(?:[A-Za-z]+\s+){0,3}[A-Za-z]+\s+(?:street|st|avenue|ave|road|rd|drive|dr|lane|ln)\b",
        ),
        PatternRule::new(
            PhiCategory::CreditCard,
            Severity::Critical,
            r"\b(?:\d{4}[-\s]?){3}\d{4}\b",
        ),
    ]
});

/// The fixed, ordered pattern table
pub fn pattern_table() -> &'static [PatternRule] {
    &PATTERN_TABLE
}
