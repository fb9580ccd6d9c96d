//! Workflow status summary, human and machine readable.
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::draft::{self, RpsDraft, Step, WorkdirPaths, STEP_ORDER};
use crate::validate::{self, Severity};

/// Schema version for the status summary JSON.
pub const STATUS_SCHEMA_VERSION: u32 = 1;

/// Overall verdict on the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Complete,
    Incomplete,
    Blocked,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Complete => "complete",
            Decision::Incomplete => "incomplete",
            Decision::Blocked => "blocked",
        }
    }
}

/// The single recommended follow-up for the operator.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NextAction {
    Command { command: String, reason: String },
    Edit { path: String, reason: String },
}

/// Per-step roll-up of progress and findings.
#[derive(Debug, Serialize)]
pub struct StepStatus {
    pub step: Step,
    pub completed: bool,
    pub blocking: u32,
    pub advisory: u32,
    pub submit_errors: u32,
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub schema_version: u32,
    pub generated_at_epoch_ms: u128,
    pub rps_id: u64,
    pub active_step: Step,
    pub steps: Vec<StepStatus>,
    pub weekly_weight_total: f64,
    pub assignment_weight_total: f64,
    pub defaulted_fields: u32,
    pub decision: Decision,
    pub decision_reason: String,
    pub next_action: NextAction,
    pub warnings: Vec<String>,
}

/// Derive the status summary from the draft alone; no network traffic.
pub fn build_status_summary(draft: &RpsDraft, draft_path: &Path) -> Result<StatusSummary> {
    let mut steps = Vec::with_capacity(STEP_ORDER.len());
    let mut warnings = Vec::new();
    let mut total_blocking = 0u32;
    let mut total_submit_errors = 0u32;
    let mut first_blocked: Option<Step> = None;

    for step in STEP_ORDER {
        let messages = validate::validate_step(draft, step);
        let blocking = messages
            .iter()
            .filter(|message| message.severity == Severity::Error)
            .count() as u32;
        let advisory = messages.len() as u32 - blocking;
        for message in &messages {
            if message.severity == Severity::Warning {
                warnings.push(format!("[{step}] {}", message.render()));
            }
        }
        let submit_errors = draft
            .wizard
            .step_errors
            .get(&step)
            .map(|errors| errors.len() as u32)
            .unwrap_or(0);
        if (blocking > 0 || submit_errors > 0) && first_blocked.is_none() {
            first_blocked = Some(step);
        }
        total_blocking += blocking;
        total_submit_errors += submit_errors;
        steps.push(StepStatus {
            step,
            completed: draft.wizard.completed_steps.contains(&step),
            blocking,
            advisory,
            submit_errors,
        });
    }

    let weekly_weight_total: f64 = draft
        .weekly_plans
        .iter()
        .filter(|plan| plan.has_content())
        .map(|plan| plan.weight_percent)
        .sum();
    let assignment_weight_total: f64 = draft
        .assignments
        .iter()
        .filter(|task| task.has_content())
        .map(|task| task.weight_percent)
        .sum();
    if draft.wizard.defaulted_fields > 0 {
        warnings.push(format!(
            "{} field(s) were filled with defaults on pull",
            draft.wizard.defaulted_fields
        ));
    }

    let all_visited = STEP_ORDER
        .iter()
        .all(|step| draft.wizard.completed_steps.contains(step));
    let (decision, decision_reason, next_action) = if total_blocking > 0 {
        let step = first_blocked.unwrap_or(draft.wizard.active_step);
        (
            Decision::Blocked,
            format!("{total_blocking} blocking validation issue(s)"),
            NextAction::Edit {
                path: draft_path.display().to_string(),
                reason: format!("resolve blocking issues starting with step {step}"),
            },
        )
    } else if total_submit_errors > 0 {
        let step = first_blocked.unwrap_or(draft.wizard.active_step);
        (
            Decision::Blocked,
            format!("{total_submit_errors} submission error(s) from earlier pushes"),
            NextAction::Command {
                command: format!("rps push --step {step}"),
                reason: format!("retry failed submissions for step {step}"),
            },
        )
    } else if all_visited {
        (
            Decision::Complete,
            "all steps submitted cleanly".to_string(),
            NextAction::Command {
                command: "rps finalize".to_string(),
                reason: "conclude the workflow".to_string(),
            },
        )
    } else {
        (
            Decision::Incomplete,
            format!("on step {} of {}", draft.wizard.active_step, Step::last()),
            NextAction::Command {
                command: "rps next".to_string(),
                reason: format!("submit and advance from step {}", draft.wizard.active_step),
            },
        )
    };

    Ok(StatusSummary {
        schema_version: STATUS_SCHEMA_VERSION,
        generated_at_epoch_ms: draft::now_epoch_ms()?,
        rps_id: draft.rps_id,
        active_step: draft.wizard.active_step,
        steps,
        weekly_weight_total,
        assignment_weight_total,
        defaulted_fields: draft.wizard.defaulted_fields,
        decision,
        decision_reason,
        next_action,
        warnings,
    })
}

pub fn run_status(workdir: PathBuf, json: bool) -> Result<()> {
    let paths = WorkdirPaths::new(workdir);
    let draft = draft::load_draft(&paths)?;
    let summary = build_status_summary(&draft, &paths.draft_path())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "RPS {}: {} ({})",
        summary.rps_id,
        summary.decision.as_str(),
        summary.decision_reason
    );
    println!("active step: {}", summary.active_step);
    for step in &summary.steps {
        let marker = if step.completed { "x" } else { " " };
        let mut extras = Vec::new();
        if step.blocking > 0 {
            extras.push(format!("{} blocking", step.blocking));
        }
        if step.advisory > 0 {
            extras.push(format!("{} advisory", step.advisory));
        }
        if step.submit_errors > 0 {
            extras.push(format!("{} submit error(s)", step.submit_errors));
        }
        let suffix = if extras.is_empty() {
            String::new()
        } else {
            format!(" ({})", extras.join(", "))
        };
        println!("  [{marker}] {}{suffix}", step.step);
    }
    println!(
        "weights: weekly {:.1}%, assignments {:.1}%",
        summary.weekly_weight_total, summary.assignment_weight_total
    );
    for warning in &summary.warnings {
        println!("warning: {warning}");
    }
    match &summary.next_action {
        NextAction::Command { command, reason } => println!("next: {command} ({reason})"),
        NextAction::Edit { path, reason } => println!("next: edit {path} ({reason})"),
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
