//! Scan result types
//!
//! These types serialize with camelCase field names, matching the JSON
//! payload the presentation layer renders.

use crate::rules::{PhiCategory, Severity};
use serde::{Deserialize, Serialize};

/// Risk classification derived from the compliance score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classify a compliance score
    ///
    /// The thresholds are strict: a score of exactly 85 is Medium and a score
    /// of exactly 70 is High.
    pub fn from_score(score: u8) -> Self {
        if score > 85 {
            RiskLevel::Low
        } else if score > 70 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

/// One finding per category that matched at least once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationFinding {
    /// Category that matched
    pub category: PhiCategory,

    /// Human-readable category description
    pub display_name: String,

    /// Severity copied from the rule
    pub severity: Severity,

    /// Number of non-overlapping matches in the input
    pub occurrence_count: usize,

    /// Up to three matched substrings, in order of first appearance
    pub sample_matches: Vec<String>,

    /// Estimated fine exposure for this category in USD
    pub fine_risk: u64,
}

/// The engine's sole output, immutable once produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Findings in pattern-table order; categories with zero matches are absent
    pub violations: Vec<ViolationFinding>,

    /// Input text with every match replaced by its category placeholder
    pub redacted_text: String,

    /// Sum of occurrence counts across all findings
    pub total_violation_count: usize,

    /// 0-100, driven by the number of distinct violating categories
    pub compliance_score: u8,

    /// Classification of the compliance score
    pub risk_level: RiskLevel,

    /// Sum of per-category fine risks in USD
    pub estimated_fine_exposure: u64,

    /// Weighted count of Critical and High findings
    pub urgency_score: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_thresholds_are_strict() {
        assert_eq!(RiskLevel::from_score(100), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(86), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(85), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(71), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0), RiskLevel::High);
    }

    #[test]
    fn risk_level_serializes_capitalized() {
        assert_eq!(
            serde_json::to_string(&RiskLevel::Low).unwrap(),
            "\"Low\""
        );
        assert_eq!(
            serde_json::to_string(&RiskLevel::Medium).unwrap(),
            "\"Medium\""
        );
    }

    #[test]
    fn scan_result_serializes_camel_case() {
        let result = ScanResult {
            violations: vec![ViolationFinding {
                category: PhiCategory::Ssn,
                display_name: PhiCategory::Ssn.display_name().to_string(),
                severity: Severity::Critical,
                occurrence_count: 1,
                sample_matches: vec!["123-45-6789".to_string()],
                fine_risk: 50_000,
            }],
            redacted_text: "[SSN_REDACTED]".to_string(),
            total_violation_count: 1,
            compliance_score: 88,
            risk_level: RiskLevel::Low,
            estimated_fine_exposure: 50_000,
            urgency_score: 3,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("redactedText").is_some());
        assert!(json.get("totalViolationCount").is_some());
        assert!(json.get("complianceScore").is_some());
        assert!(json.get("riskLevel").is_some());
        assert!(json.get("estimatedFineExposure").is_some());
        assert!(json.get("urgencyScore").is_some());

        let finding = &json["violations"][0];
        assert!(finding.get("occurrenceCount").is_some());
        assert!(finding.get("sampleMatches").is_some());
        assert!(finding.get("fineRisk").is_some());
        assert_eq!(finding["severity"], "Critical");
    }

    #[test]
    fn scan_result_round_trips() {
        let result = ScanResult {
            violations: vec![],
            redacted_text: String::new(),
            total_violation_count: 0,
            compliance_score: 100,
            risk_level: RiskLevel::Low,
            estimated_fine_exposure: 0,
            urgency_score: 0,
        };

        let json = serde_json::to_string(&result).unwrap();
        let back: ScanResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
