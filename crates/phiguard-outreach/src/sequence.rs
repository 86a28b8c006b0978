//! Outreach sequence assembly
//!
//! Sequences are pure data: each step carries a day offset relative to the
//! moment the sequence starts and an optional send condition. The caller
//! owns the clock and the transport.

use crate::templates::{
    email_templates, linkedin_templates, nurture_templates, Audience,
};
use phiguard_core::template::{render, TemplateContext};
use phiguard_core::{LeadContact, ScanSummary};
use serde::{Deserialize, Serialize};

/// Delivery channel for a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Linkedin,
    Email,
}

/// Condition gating a step's delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepCondition {
    /// Send unconditionally
    Always,
    /// Send only after the connection request was accepted
    ConnectionAccepted,
    /// Send only if the prospect has not replied
    NoResponse,
}

/// One scheduled message in a sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceStep {
    pub day_offset: u32,
    pub channel: Channel,
    pub condition: StepCondition,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    pub body: String,
}

/// A fully personalized sequence, ready to hand to a scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachPlan {
    pub audience: Audience,
    pub recipient: String,
    pub steps: Vec<SequenceStep>,
}

/// A prospect sourced for outbound messaging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prospect {
    pub first_name: String,
    pub company_name: String,
    pub role: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Sender-side settings shared by every rendered message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachSettings {
    pub sender_name: String,
    pub tool_link: String,
    pub report_link: String,
}

impl Default for OutreachSettings {
    fn default() -> Self {
        Self {
            sender_name: "The PHI Guard Team".to_string(),
            tool_link: "https://phiguard.example.com".to_string(),
            report_link: "https://phiguard.example.com/report".to_string(),
        }
    }
}

/// The lead-capture collaborator: accepts a contact plus their scan summary
/// and owns whatever follow-up happens next.
pub trait NurtureSink: Send + Sync {
    fn enqueue(&self, contact: &LeadContact, summary: &ScanSummary);
}

fn prospect_context(prospect: &Prospect, settings: &OutreachSettings) -> TemplateContext {
    TemplateContext::new()
        .with("firstName", prospect.first_name.clone())
        .with("companyName", prospect.company_name.clone())
        .with(
            "industry",
            prospect.industry.clone().unwrap_or_else(|| "healthcare".to_string()),
        )
        .with("toolLink", settings.tool_link.clone())
        .with("senderName", settings.sender_name.clone())
}

/// Build the four-touch LinkedIn sequence for a prospect
///
/// Day 0 connection request, day 3 initial message once connected, follow-ups
/// on days 7 and 14 while there is no response.
pub fn linkedin_sequence(prospect: &Prospect, settings: &OutreachSettings) -> OutreachPlan {
    let audience = Audience::for_role(&prospect.role);
    let templates = linkedin_templates(audience);
    let ctx = prospect_context(prospect, settings);

    let recipient = prospect
        .linkedin_url
        .clone()
        .unwrap_or_else(|| prospect.first_name.clone());

    let steps = vec![
        SequenceStep {
            day_offset: 0,
            channel: Channel::Linkedin,
            condition: StepCondition::Always,
            subject: None,
            body: render(templates.connection_request, &ctx),
        },
        SequenceStep {
            day_offset: 3,
            channel: Channel::Linkedin,
            condition: StepCondition::ConnectionAccepted,
            subject: None,
            body: render(templates.initial_message, &ctx),
        },
        SequenceStep {
            day_offset: 7,
            channel: Channel::Linkedin,
            condition: StepCondition::NoResponse,
            subject: None,
            body: render(templates.follow_up_1, &ctx),
        },
        SequenceStep {
            day_offset: 14,
            channel: Channel::Linkedin,
            condition: StepCondition::NoResponse,
            subject: None,
            body: render(templates.follow_up_2, &ctx),
        },
    ];

    OutreachPlan {
        audience,
        recipient,
        steps,
    }
}

/// Build the three-touch email sequence for a prospect
pub fn email_sequence(prospect: &Prospect, settings: &OutreachSettings) -> OutreachPlan {
    let audience = Audience::for_role(&prospect.role);
    let templates = email_templates(audience);
    let ctx = prospect_context(prospect, settings);

    let subject = render(templates.subject, &ctx);
    let recipient = prospect
        .email
        .clone()
        .unwrap_or_else(|| prospect.first_name.clone());

    let steps = vec![
        SequenceStep {
            day_offset: 0,
            channel: Channel::Email,
            condition: StepCondition::Always,
            subject: Some(subject.clone()),
            body: render(templates.initial_email, &ctx),
        },
        SequenceStep {
            day_offset: 3,
            channel: Channel::Email,
            condition: StepCondition::NoResponse,
            subject: Some(format!("Re: {subject}")),
            body: render(templates.follow_up_1, &ctx),
        },
        SequenceStep {
            day_offset: 7,
            channel: Channel::Email,
            condition: StepCondition::NoResponse,
            subject: Some(format!("Final note: {subject}")),
            body: render(templates.follow_up_2, &ctx),
        },
    ];

    OutreachPlan {
        audience,
        recipient,
        steps,
    }
}

/// Build the free-scan nurture drip for a captured lead
///
/// The drip personalizes against the lead's scan summary; company falls back
/// to a generic phrase and the first name comes from the first word of the
/// contact's name.
pub fn nurture_sequence(
    contact: &LeadContact,
    summary: &ScanSummary,
    settings: &OutreachSettings,
) -> OutreachPlan {
    let first_name = contact
        .name
        .as_deref()
        .and_then(|n| n.split_whitespace().next())
        .unwrap_or("there")
        .to_string();
    let company = contact
        .company
        .clone()
        .unwrap_or_else(|| "your company".to_string());

    let ctx = TemplateContext::new()
        .with("firstName", first_name)
        .with("companyName", company)
        .with("violationCount", summary.total_violation_count.to_string())
        .with("complianceScore", summary.compliance_score.to_string())
        .with("riskLevel", summary.risk_level.clone())
        .with("reportLink", settings.report_link.clone())
        .with("senderName", settings.sender_name.clone());

    let steps = nurture_templates()
        .iter()
        .map(|t| SequenceStep {
            day_offset: t.day_offset,
            channel: Channel::Email,
            condition: StepCondition::Always,
            subject: Some(render(t.subject, &ctx)),
            body: render(t.body, &ctx),
        })
        .collect();

    OutreachPlan {
        audience: Audience::HealthcareAiStartup,
        recipient: contact.email.clone(),
        steps,
    }
}
