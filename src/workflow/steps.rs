//! Wizard transitions: advancing, retreating, jumping, and concluding.
use anyhow::{anyhow, Result};
use std::path::PathBuf;

use crate::api::ApiClient;
use crate::draft::{self, HistoryEntry, Step};
use crate::validate::{self, Severity};

use super::submit::{submit_step, StepSubmitOutcome};
use super::WorkflowContext;

/// Validate, submit, and advance from the active step.
///
/// Blocking validation aborts before any network traffic. Submission errors
/// keep the wizard on the current step so the operator retries in place;
/// partial successes (adopted ids, drained deletes) are kept either way.
pub fn advance_step(client: &ApiClient, draft: &mut draft::RpsDraft) -> Result<StepSubmitOutcome> {
    let step = draft.wizard.active_step;
    let messages = validate::validate_step(draft, step);
    if validate::has_blocking(&messages) {
        let rendered: Vec<String> = messages
            .iter()
            .filter(|message| message.severity == Severity::Error)
            .map(|message| message.render())
            .collect();
        return Err(anyhow!(
            "step {step} has {} blocking issue(s): {}",
            rendered.len(),
            rendered.join("; ")
        ));
    }
    let outcome = submit_step(client, draft, step);
    if outcome.ok() {
        draft.wizard.completed_steps.insert(step);
        if let Some(next) = step.next() {
            draft.wizard.active_step = next;
        }
    }
    Ok(outcome)
}

/// Validate and submit the terminal step, concluding the workflow.
///
/// Only reachable from the last step; earlier steps advance with `next`.
pub fn finalize(client: &ApiClient, draft: &mut draft::RpsDraft) -> Result<StepSubmitOutcome> {
    let step = draft.wizard.active_step;
    if step != Step::last() {
        return Err(anyhow!(
            "finalize is only available from step {} (currently on {step})",
            Step::last()
        ));
    }
    let messages = validate::validate_step(draft, step);
    if validate::has_blocking(&messages) {
        let rendered: Vec<String> = messages
            .iter()
            .filter(|message| message.severity == Severity::Error)
            .map(|message| message.render())
            .collect();
        return Err(anyhow!(
            "step {step} has {} blocking issue(s): {}",
            rendered.len(),
            rendered.join("; ")
        ));
    }
    let outcome = submit_step(client, draft, step);
    if outcome.ok() {
        draft.wizard.completed_steps.insert(step);
    }
    Ok(outcome)
}

pub fn run_next(workdir: PathBuf) -> Result<()> {
    let mut ctx = WorkflowContext::load(workdir)?;
    let step = ctx.draft.wizard.active_step;
    for message in validate::validate_step(&ctx.draft, step) {
        if message.severity == Severity::Warning {
            println!("warning: {}", message.render());
        }
    }

    let client = ctx.client();
    let outcome = advance_step(&client, &mut ctx.draft)?;
    ctx.persist_tokens(&client)?;
    ctx.save_draft()?;
    draft::append_history(
        &ctx.paths,
        &HistoryEntry::now("next", Some(step), outcome.ok(), outcome.errors.len() as u32)?,
    )?;

    if !outcome.ok() {
        for error in &outcome.errors {
            println!("error: {error}");
        }
        return Err(anyhow!(
            "{} submission error(s) on step {step}; wizard stays on {step}",
            outcome.errors.len()
        ));
    }
    if step == Step::last() {
        println!("step {step} submitted; run `rps finalize` to conclude");
    } else {
        println!(
            "step {step} submitted; now on step {}",
            ctx.draft.wizard.active_step
        );
    }
    Ok(())
}

/// Move back one step. Never validates or submits; draft edits stay local.
pub fn run_prev(workdir: PathBuf) -> Result<()> {
    let mut ctx = WorkflowContext::load(workdir)?;
    let step = ctx.draft.wizard.active_step;
    let Some(previous) = step.previous() else {
        return Err(anyhow!("already on the first step ({step})"));
    };
    ctx.draft.wizard.active_step = previous;
    ctx.save_draft()?;
    draft::append_history(&ctx.paths, &HistoryEntry::now("prev", Some(previous), true, 0)?)?;
    println!("now on step {previous}");
    Ok(())
}

/// Jump directly to a step. Free navigation matches revisit-any-tab editing.
pub fn run_goto(workdir: PathBuf, step: Step) -> Result<()> {
    let mut ctx = WorkflowContext::load(workdir)?;
    ctx.draft.wizard.active_step = step;
    ctx.save_draft()?;
    draft::append_history(&ctx.paths, &HistoryEntry::now("goto", Some(step), true, 0)?)?;
    println!("now on step {step}");
    Ok(())
}

pub fn run_finalize(workdir: PathBuf, force: bool) -> Result<()> {
    let mut ctx = WorkflowContext::load(workdir)?;
    let client = ctx.client();
    let outcome = finalize(&client, &mut ctx.draft)?;
    ctx.persist_tokens(&client)?;
    ctx.save_draft()?;

    let outstanding: Vec<String> = ctx
        .draft
        .wizard
        .step_errors
        .iter()
        .flat_map(|(step, errors)| {
            errors
                .iter()
                .map(move |error| format!("[{step}] {error}"))
        })
        .collect();
    let concluded = outstanding.is_empty() || force;
    draft::append_history(
        &ctx.paths,
        &HistoryEntry::now(
            "finalize",
            Some(outcome.step),
            concluded,
            outstanding.len() as u32,
        )?,
    )?;

    if !outstanding.is_empty() {
        for error in &outstanding {
            println!("outstanding: {error}");
        }
        if !force {
            return Err(anyhow!(
                "{} outstanding submission error(s); rerun with --force to conclude anyway",
                outstanding.len()
            ));
        }
        println!("concluding despite outstanding errors (--force)");
    }
    println!("workflow concluded for RPS {}", ctx.draft.rps_id);
    Ok(())
}
