//! Per-step validation rules.
//!
//! Validation is pure and synchronous; it gates the network phase of a push
//! but never talks to the remote store itself. Hard rules block advancement,
//! soft rules only warn — the asymmetry is deliberate: structural data
//! (course, outcomes, weekly topics) is mandatory, enrichment data
//! (bibliography, analysis, sub-outcomes) is optional.
use serde::Serialize;
use std::fmt;

use crate::draft::{RpsDraft, Step};

mod grading;
mod steps;

pub use grading::{find_overlaps, rows_overlap};

/// Whether a message blocks advancement or merely advises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation finding for one step.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationMessage {
    pub step: Step,
    /// Entity-level context, e.g. `week 3` or `CPMK-02`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub message: String,
    pub severity: Severity,
}

impl ValidationMessage {
    pub fn error(step: Step, context: Option<String>, message: impl Into<String>) -> Self {
        Self {
            step,
            context,
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(step: Step, context: Option<String>, message: impl Into<String>) -> Self {
        Self {
            step,
            context,
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    /// Render with context prefix for banners and logs.
    pub fn render(&self) -> String {
        match &self.context {
            Some(context) => format!("{context}: {}", self.message),
            None => self.message.clone(),
        }
    }
}

/// Evaluate one step's rule set against the draft.
pub fn validate_step(draft: &RpsDraft, step: Step) -> Vec<ValidationMessage> {
    match step {
        Step::Info => steps::validate_info(draft),
        Step::Cpmk => steps::validate_cpmk(draft),
        Step::SubCpmk => Vec::new(),
        Step::WeeklyPlan => steps::validate_weekly_plan(draft),
        Step::Assignments => steps::validate_assignments(draft),
        Step::Analysis => Vec::new(),
        Step::Bibliography => steps::validate_bibliography(draft),
        Step::GradingScale => steps::validate_grading_scale(draft),
    }
}

/// True when any message blocks advancement.
pub fn has_blocking(messages: &[ValidationMessage]) -> bool {
    messages
        .iter()
        .any(|message| message.severity == Severity::Error)
}

#[cfg(test)]
#[path = "steps_tests.rs"]
mod tests;
