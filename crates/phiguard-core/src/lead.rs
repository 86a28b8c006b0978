//! Lead and scan-summary types exchanged with the funnel

use serde::{Deserialize, Serialize};

/// Where a lead came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeadSource {
    Linkedin,
    Email,
    #[default]
    Direct,
    Referral,
}

impl LeadSource {
    /// Stable label used in stats and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::Linkedin => "linkedin",
            LeadSource::Email => "email",
            LeadSource::Direct => "direct",
            LeadSource::Referral => "referral",
        }
    }
}

/// Contact details captured from the funnel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadContact {
    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(default)]
    pub source: LeadSource,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
}

/// The slice of a scan result the messaging layer personalizes against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub total_violation_count: usize,
    pub compliance_score: u8,
    pub risk_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_source_defaults_to_direct() {
        let contact: LeadContact =
            serde_json::from_str(r#"{"email":"a@b.com"}"#).unwrap();
        assert_eq!(contact.source, LeadSource::Direct);
    }

    #[test]
    fn lead_source_deserializes_lowercase() {
        let contact: LeadContact =
            serde_json::from_str(r#"{"email":"a@b.com","source":"linkedin"}"#).unwrap();
        assert_eq!(contact.source, LeadSource::Linkedin);
        assert_eq!(contact.source.as_str(), "linkedin");
    }

    #[test]
    fn scan_summary_serializes_camel_case() {
        let summary = ScanSummary {
            total_violation_count: 4,
            compliance_score: 52,
            risk_level: "High".to_string(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalViolationCount"], 4);
        assert_eq!(json["complianceScore"], 52);
        assert_eq!(json["riskLevel"], "High");
    }
}
