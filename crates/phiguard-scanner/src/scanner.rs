//! The scan operation
//!
//! `PhiScanner::scan` is a pure, synchronous function of its input: no I/O,
//! no shared state, safe to call from any number of threads at once.

use crate::report::{RiskLevel, ScanResult, ViolationFinding};
use crate::rules::pattern_table;
use thiserror::Error;

/// Cap on sample substrings collected per finding
const MAX_SAMPLE_MATCHES: usize = 3;

/// Occurrences beyond this count do not increase a category's fine estimate
const FINE_CAP_OCCURRENCES: usize = 3;

/// Compliance score deduction per distinct violating category
const CATEGORY_SCORE_PENALTY: i32 = 12;

/// Scan failure modes
#[derive(Debug, Error)]
pub enum ScanError {
    /// Input exceeded the configured size guard
    #[error("input exceeds maximum scan size: {actual} bytes (limit {limit})")]
    InputTooLarge { actual: usize, limit: usize },
}

/// Scanner configuration
#[derive(Debug, Clone, Default)]
pub struct ScannerConfig {
    /// Optional input-size guard, checked before any matching runs.
    ///
    /// `None` disables the guard; callers that accept untrusted input should
    /// set a limit at their boundary instead.
    pub max_input_bytes: Option<usize>,
}

/// PHI scanner and risk assessor
#[derive(Debug, Clone, Default)]
pub struct PhiScanner {
    config: ScannerConfig,
}

impl PhiScanner {
    /// Create a scanner with no input-size guard
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scanner with the given configuration
    pub fn with_config(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Scan `text` for PHI patterns and produce a risk assessment
    ///
    /// Empty and non-matching input succeed with a perfect score. Counting
    /// and sample collection always run against the original input; only the
    /// redacted text reflects the cumulative replacement passes.
    pub fn scan(&self, text: &str) -> Result<ScanResult, ScanError> {
        if let Some(limit) = self.config.max_input_bytes {
            if text.len() > limit {
                return Err(ScanError::InputTooLarge {
                    actual: text.len(),
                    limit,
                });
            }
        }

        let mut working = text.to_string();
        let mut violations = Vec::new();

        for rule in pattern_table() {
            if !rule.applies_to(text) {
                continue;
            }

            let mut occurrence_count = 0;
            let mut sample_matches = Vec::new();
            for m in rule.matcher.find_iter(text) {
                occurrence_count += 1;
                if sample_matches.len() < MAX_SAMPLE_MATCHES {
                    sample_matches.push(m.as_str().to_string());
                }
            }

            if occurrence_count == 0 {
                continue;
            }

            let fine_risk =
                rule.severity.base_fine() * occurrence_count.min(FINE_CAP_OCCURRENCES) as u64;

            violations.push(ViolationFinding {
                category: rule.category,
                display_name: rule.category.display_name().to_string(),
                severity: rule.severity,
                occurrence_count,
                sample_matches,
                fine_risk,
            });

            // Redaction runs against the working copy, so later categories
            // see the effects of earlier passes.
            working = rule
                .matcher
                .replace_all(&working, rule.category.placeholder())
                .into_owned();
        }

        let compliance_score =
            (100 - CATEGORY_SCORE_PENALTY * violations.len() as i32).max(0) as u8;

        Ok(ScanResult {
            total_violation_count: violations.iter().map(|v| v.occurrence_count).sum(),
            compliance_score,
            risk_level: RiskLevel::from_score(compliance_score),
            estimated_fine_exposure: violations.iter().map(|v| v.fine_risk).sum(),
            urgency_score: violations.iter().map(|v| v.severity.urgency_weight()).sum(),
            violations,
            redacted_text: working,
        })
    }
}

#[cfg(test)]
mod tests;
