//! Outreach message templates
//!
//! Template bodies use {{variable}} placeholders rendered by the core
//! template engine. Each audience gets its own LinkedIn and email set;
//! the free-scan nurture set additionally references the prospect's scan
//! results ({{violationCount}}, {{complianceScore}}, {{riskLevel}}).

use serde::{Deserialize, Serialize};

/// Prospect audience, selected from the prospect's role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Audience {
    HealthcareAiStartup,
    ComplianceOfficer,
    HealthcareItLeader,
}

impl Audience {
    /// Pick the audience for a role description
    ///
    /// Compliance roles win over IT roles; anything unrecognized falls back
    /// to the startup set.
    pub fn for_role(role: &str) -> Self {
        let role = role.to_lowercase();
        if role.contains("compliance") {
            Audience::ComplianceOfficer
        } else if role.contains("it") || role.contains("technology") || role.contains("cto") {
            Audience::HealthcareItLeader
        } else {
            Audience::HealthcareAiStartup
        }
    }
}

/// LinkedIn message set for one audience
pub struct LinkedInTemplates {
    pub connection_request: &'static str,
    pub initial_message: &'static str,
    pub follow_up_1: &'static str,
    pub follow_up_2: &'static str,
}

/// Email message set for one audience
pub struct EmailTemplates {
    pub subject: &'static str,
    pub initial_email: &'static str,
    pub follow_up_1: &'static str,
    pub follow_up_2: &'static str,
}

/// One step of the free-scan nurture drip
pub struct NurtureTemplate {
    pub day_offset: u32,
    pub subject: &'static str,
    pub body: &'static str,
}

/// LinkedIn templates for an audience
pub fn linkedin_templates(audience: Audience) -> &'static LinkedInTemplates {
    match audience {
        Audience::HealthcareAiStartup => &STARTUP_LINKEDIN,
        Audience::ComplianceOfficer => &COMPLIANCE_LINKEDIN,
        Audience::HealthcareItLeader => &IT_LINKEDIN,
    }
}

/// Email templates for an audience
pub fn email_templates(audience: Audience) -> &'static EmailTemplates {
    match audience {
        Audience::HealthcareAiStartup => &STARTUP_EMAIL,
        Audience::ComplianceOfficer => &COMPLIANCE_EMAIL,
        Audience::HealthcareItLeader => &IT_EMAIL,
    }
}

/// Nurture drip sent to free-scan users who have not purchased
pub fn nurture_templates() -> &'static [NurtureTemplate] {
    &FREE_SCAN_NURTURE
}

static STARTUP_LINKEDIN: LinkedInTemplates = LinkedInTemplates {
    connection_request: "Hi {{firstName}}, I noticed {{companyName}} is working in the healthcare AI space. Would love to connect and share some insights on HIPAA compliance for AI training data.",
    initial_message: "Hi {{firstName}},\n\nNoticed {{companyName}} is working with healthcare AI. Most startups unknowingly violate HIPAA in their training data.\n\nI built a free tool that scans for violations in 30 seconds: {{toolLink}}\n\nWorth a quick check before your next funding round or audit.\n\nBest,\n{{senderName}}",
    follow_up_1: "Hi {{firstName}},\n\nFollowing up on the HIPAA scanner I shared. A quick scan now is far cheaper than an OCR finding later.\n\n{{toolLink}}\n\nBest,\n{{senderName}}",
    follow_up_2: "Hi {{firstName}},\n\nQuick update: We just helped another {{industry}} company avoid a $75k HIPAA fine by identifying violations in their training data.\n\nOur free scanner is still available if you'd like to check your compliance status: {{toolLink}}\n\nBest,\n{{senderName}}",
};

static COMPLIANCE_LINKEDIN: LinkedInTemplates = LinkedInTemplates {
    connection_request: "Hi {{firstName}}, I'm connecting with compliance professionals in healthcare. Would love to share a free HIPAA compliance tool that might be valuable for {{companyName}}.",
    initial_message: "Hi {{firstName}},\n\nAs {{companyName}}'s compliance professional, I thought you might find this valuable.\n\nI built a tool that instantly detects PHI violations in free text.\n\nFree to try: {{toolLink}}\n\nMany compliance officers use it as a quick second opinion on internal processes.\n\nBest,\n{{senderName}}",
    follow_up_1: "Hi {{firstName}},\n\nFollowing up on the HIPAA scanner I shared. Compliance teams use it to validate data before vendor sharing and to spot-check internal systems.\n\nWould be interested in your thoughts if you've had a chance to try it: {{toolLink}}\n\nBest,\n{{senderName}}",
    follow_up_2: "Hi {{firstName}},\n\nQuick update: we've enhanced the scanner based on recent OCR enforcement actions.\n\nIt now catches subtle violations that many internal tools miss: {{toolLink}}\n\nBest,\n{{senderName}}",
};

static IT_LINKEDIN: LinkedInTemplates = LinkedInTemplates {
    connection_request: "Hi {{firstName}}, I'm connecting with IT leaders in healthcare. Built a tool that might help {{companyName}} with HIPAA compliance for your data systems.",
    initial_message: "Hi {{firstName}},\n\nAs an IT leader at {{companyName}}, you're likely dealing with HIPAA compliance across multiple systems.\n\nI built a tool that instantly scans any text data for PHI violations.\n\nFree to try: {{toolLink}}\n\nUseful as an extra verification layer before data goes to vendors or AI systems.\n\nBest,\n{{senderName}}",
    follow_up_1: "Hi {{firstName}},\n\nFollowing up on the HIPAA scanner. IT teams use it for vendor exports, AI training sets, database extracts, and anonymization testing.\n\n{{toolLink}}\n\nBest,\n{{senderName}}",
    follow_up_2: "Hi {{firstName}},\n\nQuick update: there's now an API version that integrates directly into data pipelines for automated compliance checks.\n\nThe free web version is still available too: {{toolLink}}\n\nBest,\n{{senderName}}",
};

static STARTUP_EMAIL: EmailTemplates = EmailTemplates {
    subject: "Free HIPAA scan for {{companyName}}'s AI data",
    initial_email: "Hi {{firstName}},\n\nQuick question - are you confident your AI training data is HIPAA compliant?\n\n68% of healthcare startups have PHI violations they don't know about.\n\nI built a free scanner that checks in 30 seconds: {{toolLink}}\n\nTakes 30 seconds to verify you're in the clear.\n\nBest,\n{{senderName}}",
    follow_up_1: "Hi {{firstName}},\n\nJust following up on my previous email about HIPAA compliance for {{companyName}}'s AI data.\n\nThe recent increase in OCR enforcement actions has many healthcare startups concerned about their training data.\n\nOur free scanner takes just 30 seconds: {{toolLink}}\n\nBest,\n{{senderName}}",
    follow_up_2: "Hi {{firstName}},\n\nFinal note on HIPAA compliance for {{companyName}}.\n\nWe recently helped a {{industry}} company discover and fix critical PHI violations in their AI training data, saving them from potential fines of $50,000+.\n\nIf you'd like to check your own data, our free scanner is still available: {{toolLink}}\n\nBest,\n{{senderName}}",
};

static COMPLIANCE_EMAIL: EmailTemplates = EmailTemplates {
    subject: "HIPAA Compliance Tool for {{companyName}}",
    initial_email: "Hi {{firstName}},\n\nAs {{companyName}}'s compliance professional, I thought you might find this valuable.\n\nI've developed a tool that instantly detects PHI violations in healthcare data, helping compliance teams identify risks before they become costly fines.\n\nFree to try: {{toolLink}}\n\nWith OCR investigations up sharply this year, many compliance officers use this as a quick second opinion to validate their internal processes.\n\nBest,\n{{senderName}}",
    follow_up_1: "Hi {{firstName}},\n\nFollowing up on the HIPAA compliance scanner I shared last week.\n\nMany compliance teams are finding it particularly useful for:\n\n1. Validating data before sharing with vendors\n2. Checking AI training datasets for PHI\n3. Conducting spot-checks on internal systems\n\nWould be interested in your thoughts if you've had a chance to try it: {{toolLink}}\n\nBest,\n{{senderName}}",
    follow_up_2: "Hi {{firstName}},\n\nJust a quick update: we've enhanced our HIPAA scanner based on the latest OCR enforcement actions.\n\nIt now detects subtle PHI patterns that many compliance tools miss, including indirect patient identifiers and combined demographic data.\n\nThe scanner remains free to use: {{toolLink}}\n\nBest,\n{{senderName}}",
};

static IT_EMAIL: EmailTemplates = EmailTemplates {
    subject: "HIPAA Compliance Tool for {{companyName}}'s IT Systems",
    initial_email: "Hi {{firstName}},\n\nAs an IT leader at {{companyName}}, you're likely dealing with HIPAA compliance across multiple systems.\n\nI've developed a tool that instantly scans for PHI violations in any text data - useful for checking databases, exports, or AI training sets.\n\nFree to try: {{toolLink}}\n\nMany IT teams are using it to audit their data before it goes to vendors or AI systems, providing an extra layer of compliance verification.\n\nBest,\n{{senderName}}",
    follow_up_1: "Hi {{firstName}},\n\nFollowing up on the HIPAA compliance scanner I shared.\n\nIT teams are finding it particularly valuable for:\n- Validating vendor data exports\n- Checking AI training datasets\n- Auditing database extracts\n- Testing data anonymization processes\n\nWould love your feedback if you've had a chance to try it: {{toolLink}}\n\nBest,\n{{senderName}}",
    follow_up_2: "Hi {{firstName}},\n\nQuick update that might interest your team at {{companyName}}:\n\nWe've just released an API version of our HIPAA scanner that can be integrated directly into data pipelines for automated compliance checking.\n\nThe free web version is still available too: {{toolLink}}\n\nBest,\n{{senderName}}",
};

static FREE_SCAN_NURTURE: [NurtureTemplate; 3] = [
    NurtureTemplate {
        day_offset: 0,
        subject: "Your HIPAA Scan Results - Next Steps",
        body: "Hi {{firstName}},\n\nThanks for using our HIPAA compliance scanner!\n\nYour scan detected {{violationCount}} potential violations that could put {{companyName}} at risk of fines starting at $50,000.\n\nTo get a detailed breakdown of these violations and step-by-step remediation instructions, check out our comprehensive report:\n\n{{reportLink}}\n\nBest,\n{{senderName}}",
    },
    NurtureTemplate {
        day_offset: 3,
        subject: "HIPAA Violation Case Study: $75,000 Fine Avoided",
        body: "Hi {{firstName}},\n\nI wanted to share a quick case study that might be relevant to {{companyName}}.\n\nLast month, a healthcare AI startup used our scanner and discovered 8 critical PHI violations in their training data, weeks before an OCR audit. They fixed all of them in 2 days and passed - avoiding a minimum $75,000 fine.\n\nIf you'd like the same detailed remediation guide for the {{violationCount}} violations we found in your scan:\n\n{{reportLink}}\n\nBest,\n{{senderName}}",
    },
    NurtureTemplate {
        day_offset: 7,
        subject: "Limited Time: 20% off HIPAA Compliance Report",
        body: "Hi {{firstName}},\n\nJust a quick note - we're offering 20% off our detailed HIPAA compliance report for the next 48 hours.\n\nFor the {{violationCount}} violations we found in your scan (compliance score {{complianceScore}}%, risk level {{riskLevel}}), the report provides exact locations, severity ratings, and step-by-step fix instructions.\n\nUse code SAVE20 at checkout:\n{{reportLink}}\n\nBest,\n{{senderName}}",
    },
];
