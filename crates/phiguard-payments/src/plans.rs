//! The plan catalog

use crate::{PaymentError, Result};
use serde::{Deserialize, Serialize};

/// Purchasable plan ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    Report,
    Monthly,
    Enterprise,
}

impl PlanId {
    /// Stable label used in provider payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanId::Report => "report",
            PlanId::Monthly => "monthly",
            PlanId::Enterprise => "enterprise",
        }
    }

    /// Parse a plan id from its wire label
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "report" => Ok(PlanId::Report),
            "monthly" => Ok(PlanId::Monthly),
            "enterprise" => Ok(PlanId::Enterprise),
            other => Err(PaymentError::UnknownPlan(other.to_string())),
        }
    }
}

/// One entry of the plan catalog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plan {
    pub id: PlanId,
    pub name: &'static str,
    pub price_usd: u64,
}

const CATALOG: [Plan; 3] = [
    Plan {
        id: PlanId::Report,
        name: "Detailed Compliance Report",
        price_usd: 47,
    },
    Plan {
        id: PlanId::Monthly,
        name: "Monthly Monitoring",
        price_usd: 197,
    },
    Plan {
        id: PlanId::Enterprise,
        name: "Enterprise Compliance Suite",
        price_usd: 497,
    },
];

impl Plan {
    /// Look up a plan by id
    pub fn get(id: PlanId) -> &'static Plan {
        CATALOG.iter().find(|p| p.id == id).unwrap()
    }

    /// The full catalog, cheapest first
    pub fn catalog() -> &'static [Plan] {
        &CATALOG
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_prices() {
        assert_eq!(Plan::get(PlanId::Report).price_usd, 47);
        assert_eq!(Plan::get(PlanId::Monthly).price_usd, 197);
        assert_eq!(Plan::get(PlanId::Enterprise).price_usd, 497);
    }

    #[test]
    fn plan_names() {
        assert_eq!(Plan::get(PlanId::Report).name, "Detailed Compliance Report");
        assert_eq!(Plan::get(PlanId::Monthly).name, "Monthly Monitoring");
        assert_eq!(
            Plan::get(PlanId::Enterprise).name,
            "Enterprise Compliance Suite"
        );
    }

    #[test]
    fn parse_accepts_known_ids() {
        assert_eq!(PlanId::parse("report").unwrap(), PlanId::Report);
        assert_eq!(PlanId::parse("monthly").unwrap(), PlanId::Monthly);
        assert_eq!(PlanId::parse("enterprise").unwrap(), PlanId::Enterprise);
    }

    #[test]
    fn parse_rejects_unknown_ids() {
        let err = PlanId::parse("lifetime").unwrap_err();
        assert!(matches!(err, PaymentError::UnknownPlan(ref p) if p == "lifetime"));
    }

    #[test]
    fn plan_id_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&PlanId::Report).unwrap(), "\"report\"");
    }
}
