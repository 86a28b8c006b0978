//! Funnel statistics tracking
//!
//! Revenue and lead counters live in one accumulator that is constructed at
//! startup and injected into the API routes. The scanner never touches it.

use chrono::{DateTime, Utc};
use phiguard_core::LeadContact;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use uuid::Uuid;

/// Bounded history kept for transactions and leads
const MAX_RECENT: usize = 100;

/// A settled transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedTransaction {
    pub id: String,
    pub amount: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    pub method: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// A captured lead
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedLead {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

/// Revenue rollup for dashboards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSnapshot {
    pub total_revenue: f64,
    pub monthly_revenue: f64,
    pub total_transactions: u64,
    pub conversion_rate: f64,
    pub average_order_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    pub recent_transactions: Vec<RecordedTransaction>,
}

/// Lead rollup for dashboards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSnapshot {
    pub total_leads: u64,
    pub monthly_leads: u64,
    pub sources: HashMap<String, u64>,
    pub recent_leads: Vec<RecordedLead>,
}

#[derive(Debug, Default)]
struct FunnelInner {
    total_revenue: f64,
    monthly_revenue: f64,
    last_updated: Option<DateTime<Utc>>,
    lead_sources: HashMap<String, u64>,
    recent_transactions: VecDeque<RecordedTransaction>,
    recent_leads: VecDeque<RecordedLead>,
}

/// Thread-safe funnel statistics accumulator
#[derive(Debug, Default)]
pub struct FunnelStats {
    total_transactions: AtomicU64,
    total_leads: AtomicU64,
    monthly_leads: AtomicU64,
    requests: AtomicU64,
    errors: AtomicU64,
    inner: RwLock<FunnelInner>,
}

impl FunnelStats {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a captured lead and return its id
    pub fn record_lead(&self, contact: &LeadContact) -> String {
        let id = Uuid::new_v4().to_string();

        self.total_leads.fetch_add(1, Ordering::Relaxed);
        self.monthly_leads.fetch_add(1, Ordering::Relaxed);

        let mut inner = self.inner.write().unwrap();
        *inner
            .lead_sources
            .entry(contact.source.as_str().to_string())
            .or_insert(0) += 1;

        inner.recent_leads.push_front(RecordedLead {
            id: id.clone(),
            email: contact.email.clone(),
            name: contact.name.clone(),
            company: contact.company.clone(),
            source: contact.source.as_str().to_string(),
            timestamp: Utc::now(),
        });
        inner.recent_leads.truncate(MAX_RECENT);

        id
    }

    /// Record a settled transaction
    pub fn record_transaction(
        &self,
        id: String,
        amount: f64,
        currency: String,
        customer: Option<String>,
        method: &str,
    ) {
        self.total_transactions.fetch_add(1, Ordering::Relaxed);

        let mut inner = self.inner.write().unwrap();
        inner.total_revenue += amount;
        inner.monthly_revenue += amount;
        inner.last_updated = Some(Utc::now());

        inner.recent_transactions.push_front(RecordedTransaction {
            id,
            amount,
            currency,
            customer,
            method: method.to_string(),
            status: "completed".to_string(),
            timestamp: Utc::now(),
        });
        inner.recent_transactions.truncate(MAX_RECENT);
    }

    /// Look up a transaction in the recent history
    pub fn find_transaction(&self, id: &str) -> Option<RecordedTransaction> {
        self.inner
            .read()
            .unwrap()
            .recent_transactions
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    /// Count an incoming HTTP request
    pub fn record_request(&self, is_error: bool) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        if is_error {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Total HTTP requests seen
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Total HTTP error responses seen
    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    /// Total leads captured
    pub fn total_leads(&self) -> u64 {
        self.total_leads.load(Ordering::Relaxed)
    }

    /// Total transactions settled
    pub fn total_transactions(&self) -> u64 {
        self.total_transactions.load(Ordering::Relaxed)
    }

    /// Share of leads that converted, as a percentage
    pub fn conversion_rate(&self) -> f64 {
        let leads = self.total_leads();
        if leads == 0 {
            return 0.0;
        }
        self.total_transactions() as f64 / leads as f64 * 100.0
    }

    /// Revenue rollup
    pub fn revenue_snapshot(&self) -> RevenueSnapshot {
        let transactions = self.total_transactions();
        let inner = self.inner.read().unwrap();

        RevenueSnapshot {
            total_revenue: inner.total_revenue,
            monthly_revenue: inner.monthly_revenue,
            total_transactions: transactions,
            conversion_rate: self.conversion_rate(),
            average_order_value: if transactions == 0 {
                0.0
            } else {
                inner.total_revenue / transactions as f64
            },
            last_updated: inner.last_updated,
            recent_transactions: inner.recent_transactions.iter().cloned().collect(),
        }
    }

    /// Lead rollup
    pub fn lead_snapshot(&self) -> LeadSnapshot {
        let inner = self.inner.read().unwrap();

        LeadSnapshot {
            total_leads: self.total_leads(),
            monthly_leads: self.monthly_leads.load(Ordering::Relaxed),
            sources: inner.lead_sources.clone(),
            recent_leads: inner.recent_leads.iter().cloned().collect(),
        }
    }
}
