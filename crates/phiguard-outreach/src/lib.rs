//! PHI Guard Outreach Sequences
//!
//! This crate provides the scripted outreach and nurturing content:
//! - Audience-keyed LinkedIn and email template sets
//! - Fixed day-offset sequences with send conditions
//! - Personalization against a lead contact and scan summary
//!
//! Everything here is pure data and string rendering. Scheduling and
//! delivery belong to the caller; no clocks or transports live in this
//! crate.

pub mod sequence;
pub mod templates;

pub use sequence::{
    email_sequence, linkedin_sequence, nurture_sequence, Channel, NurtureSink, OutreachPlan,
    OutreachSettings, Prospect, SequenceStep, StepCondition,
};
pub use templates::{email_templates, linkedin_templates, Audience};
