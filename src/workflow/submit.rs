//! Per-step reconciliation of draft state against the remote store.
//!
//! Every step submission runs the same phases: drain the step's deletion
//! queue, then walk the step's collection creating id-less entries and
//! updating id-bearing ones. Failures are collected per entity rather than
//! aborting the batch, so one rejected row never strands its siblings; there
//! is no rollback, the remote store is left wherever the batch got to.
use anyhow::Result;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;
use uuid::Uuid;

use crate::api::{routes, ApiClient};
use crate::draft::{self, HistoryEntry, RpsDraft, Step, WorkdirPaths};
use crate::validate::{self, Severity};

use super::WorkflowContext;

/// Result of submitting one step.
#[derive(Debug)]
pub struct StepSubmitOutcome {
    pub step: Step,
    pub created: u32,
    pub updated: u32,
    pub deleted: u32,
    pub skipped: u32,
    pub errors: Vec<String>,
}

impl StepSubmitOutcome {
    fn new(step: Step) -> Self {
        Self {
            step,
            created: 0,
            updated: 0,
            deleted: 0,
            skipped: 0,
            errors: Vec::new(),
        }
    }

    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Submit one step's state to the backend.
///
/// Deletions run first so a remove-then-re-add sequence never leaves a
/// duplicate. Entries without content are skipped silently; entries that
/// gain a server id adopt it immediately so a later retry updates instead
/// of re-creating.
pub fn submit_step(client: &ApiClient, draft: &mut RpsDraft, step: Step) -> StepSubmitOutcome {
    let mut outcome = StepSubmitOutcome::new(step);

    if let Some(queue) = draft.pending_deletes.for_step(step) {
        let pending = std::mem::take(queue);
        let mut retained = Vec::new();
        for id in pending {
            // The queue only exists for steps that persist a collection.
            let route = delete_route(step, id);
            match client.delete(&route) {
                Ok(()) => outcome.deleted += 1,
                Err(err) => {
                    retained.push(id);
                    outcome.errors.push(format!("delete {route}: {err}"));
                }
            }
        }
        *queue = retained;
    }

    match step {
        Step::Info => submit_info(client, draft, &mut outcome),
        Step::Cpmk => submit_cpmk(client, draft, &mut outcome),
        Step::SubCpmk => submit_sub_cpmk(client, draft, &mut outcome),
        Step::WeeklyPlan => submit_weekly_plan(client, draft, &mut outcome),
        Step::Assignments => submit_assignments(client, draft, &mut outcome),
        Step::Analysis => submit_analysis(client, draft, &mut outcome),
        Step::Bibliography => submit_bibliography(client, draft, &mut outcome),
        Step::GradingScale => submit_grading_scale(client, draft, &mut outcome),
    }

    if outcome.ok() {
        draft.wizard.step_errors.remove(&step);
    } else {
        draft
            .wizard
            .step_errors
            .insert(step, outcome.errors.clone());
    }
    tracing::debug!(
        step = %step,
        created = outcome.created,
        updated = outcome.updated,
        deleted = outcome.deleted,
        skipped = outcome.skipped,
        errors = outcome.errors.len(),
        "step submitted"
    );
    outcome
}

fn delete_route(step: Step, id: u64) -> String {
    match step {
        Step::Info => routes::rps(id),
        Step::Cpmk => routes::cpmk(id),
        Step::SubCpmk => routes::sub_cpmk(id),
        Step::WeeklyPlan => routes::weekly_plan(id),
        Step::Assignments => routes::assignment(id),
        Step::Analysis => routes::analysis(id),
        Step::Bibliography => routes::bibliography(id),
        Step::GradingScale => routes::grading_scale(id),
    }
}

fn submit_info(client: &ApiClient, draft: &RpsDraft, outcome: &mut StepSubmitOutcome) {
    let info = &draft.info;
    let payload = json!({
        "course_id": info.course_id,
        "academic_year": info.academic_year,
        "semester": info.semester,
        "coordinator_id": info.coordinator_id,
        "head_of_program_id": info.head_of_program_id,
        "description": info.description,
        "learning_outcomes": info.learning_outcomes,
        "teaching_methods": info.teaching_methods,
        "media": info.media,
    });
    match client.update(&routes::rps(draft.rps_id), &payload) {
        Ok(()) => outcome.updated += 1,
        Err(err) => outcome.errors.push(format!("info: {err}")),
    }
}

fn submit_cpmk(client: &ApiClient, draft: &mut RpsDraft, outcome: &mut StepSubmitOutcome) {
    assign_cpmk_codes(draft);
    let rps_id = draft.rps_id;
    for cpmk in &mut draft.cpmks {
        if !cpmk.has_content() {
            outcome.skipped += 1;
            continue;
        }
        let payload = json!({
            "code": cpmk.code,
            "description": cpmk.description,
            "cpl_ids": cpmk.cpl_ids,
            "order": cpmk.order,
        });
        match cpmk.id {
            Some(id) => match client.update(&routes::cpmk(id), &payload) {
                Ok(()) => outcome.updated += 1,
                Err(err) => outcome.errors.push(format!("{}: {err}", cpmk.code)),
            },
            None => match client.create(&routes::cpmk_create(rps_id), &payload) {
                Ok(id) => {
                    cpmk.id = Some(id);
                    outcome.created += 1;
                }
                Err(err) => outcome.errors.push(format!("{}: {err}", cpmk.code)),
            },
        }
    }
}

fn submit_sub_cpmk(client: &ApiClient, draft: &mut RpsDraft, outcome: &mut StepSubmitOutcome) {
    assign_sub_cpmk_codes(draft);
    // Resolve parents up front; an unsubmitted parent gates only its own
    // children.
    let parents: BTreeMap<Uuid, Option<u64>> = draft
        .cpmks
        .iter()
        .map(|cpmk| (cpmk.local_id, cpmk.id))
        .collect();
    for sub in &mut draft.sub_cpmks {
        if !sub.has_content() {
            outcome.skipped += 1;
            continue;
        }
        let payload = json!({
            "code": sub.code,
            "description": sub.description,
            "order": sub.order,
        });
        match sub.id {
            Some(id) => match client.update(&routes::sub_cpmk(id), &payload) {
                Ok(()) => outcome.updated += 1,
                Err(err) => outcome.errors.push(format!("{}: {err}", sub.code)),
            },
            None => {
                let parent_id = parents.get(&sub.cpmk_local_id).copied().flatten();
                let Some(parent_id) = parent_id else {
                    outcome.errors.push(format!(
                        "{}: owning outcome has no server id yet (push the cpmk step first)",
                        sub.code
                    ));
                    continue;
                };
                match client.create(&routes::sub_cpmk_create(parent_id), &payload) {
                    Ok(id) => {
                        sub.id = Some(id);
                        outcome.created += 1;
                    }
                    Err(err) => outcome.errors.push(format!("{}: {err}", sub.code)),
                }
            }
        }
    }
}

fn submit_weekly_plan(client: &ApiClient, draft: &mut RpsDraft, outcome: &mut StepSubmitOutcome) {
    let rps_id = draft.rps_id;
    for plan in &mut draft.weekly_plans {
        if !plan.has_content() {
            outcome.skipped += 1;
            continue;
        }
        let payload = json!({
            "week": plan.week,
            "sub_cpmk_id": plan.sub_cpmk_id,
            "topic": plan.topic,
            "sub_topics": plan.sub_topics,
            "teaching_method": plan.teaching_method,
            "duration_minutes": plan.duration_minutes,
            "assessment_technique": plan.assessment_technique,
            "assessment_criteria": plan.assessment_criteria,
            "weight_percent": plan.weight_percent,
        });
        match plan.id {
            Some(id) => match client.update(&routes::weekly_plan(id), &payload) {
                Ok(()) => outcome.updated += 1,
                Err(err) => outcome.errors.push(format!("week {}: {err}", plan.week)),
            },
            None => match client.create(&routes::weekly_plan_create(rps_id), &payload) {
                Ok(id) => {
                    plan.id = Some(id);
                    outcome.created += 1;
                }
                Err(err) => outcome.errors.push(format!("week {}: {err}", plan.week)),
            },
        }
    }
}

fn submit_assignments(client: &ApiClient, draft: &mut RpsDraft, outcome: &mut StepSubmitOutcome) {
    let rps_id = draft.rps_id;
    for task in &mut draft.assignments {
        if !task.has_content() {
            outcome.skipped += 1;
            continue;
        }
        let payload = json!({
            "sequence": task.sequence,
            "title": task.title,
            "sub_cpmk_id": task.sub_cpmk_id,
            "success_indicator": task.success_indicator,
            "deadline_week": task.deadline_week,
            "mode": task.mode,
            "instructions": task.instructions,
            "deliverable": task.deliverable,
            "grading_criteria": task.grading_criteria,
            "grading_technique": task.grading_technique,
            "weight_percent": task.weight_percent,
            "references": task.references,
        });
        match task.id {
            Some(id) => match client.update(&routes::assignment(id), &payload) {
                Ok(()) => outcome.updated += 1,
                Err(err) => outcome
                    .errors
                    .push(format!("assignment {}: {err}", task.sequence)),
            },
            None => match client.create(&routes::assignment_create(rps_id), &payload) {
                Ok(id) => {
                    task.id = Some(id);
                    outcome.created += 1;
                }
                Err(err) => outcome
                    .errors
                    .push(format!("assignment {}: {err}", task.sequence)),
            },
        }
    }
}

fn submit_analysis(client: &ApiClient, draft: &mut RpsDraft, outcome: &mut StepSubmitOutcome) {
    let rps_id = draft.rps_id;
    for row in &mut draft.analyses {
        if !row.has_content() {
            outcome.skipped += 1;
            continue;
        }
        let payload = json!({
            "week_start": row.week_start,
            "week_end": row.week_end,
            "cpl_id": row.cpl_id,
            "cpmk_ids": row.cpmk_ids,
            "sub_cpmk_ids": row.sub_cpmk_ids,
            "topic": row.topic,
            "assessment_type": row.assessment_type,
            "weight_percent": row.weight_percent,
        });
        match row.id {
            Some(id) => match client.update(&routes::analysis(id), &payload) {
                Ok(()) => outcome.updated += 1,
                Err(err) => outcome
                    .errors
                    .push(format!("analysis week {}: {err}", row.week_start)),
            },
            None => match client.create(&routes::analysis_create(rps_id), &payload) {
                Ok(id) => {
                    row.id = Some(id);
                    outcome.created += 1;
                }
                Err(err) => outcome
                    .errors
                    .push(format!("analysis week {}: {err}", row.week_start)),
            },
        }
    }
}

fn submit_bibliography(client: &ApiClient, draft: &mut RpsDraft, outcome: &mut StepSubmitOutcome) {
    let rps_id = draft.rps_id;
    for entry in &mut draft.bibliography {
        if !entry.has_content() {
            outcome.skipped += 1;
            continue;
        }
        let payload = json!({
            "title": entry.title,
            "author": entry.author,
            "year": entry.year,
            "publisher": entry.publisher,
            "kind": entry.kind,
            "isbn": entry.isbn,
            "pages": entry.pages,
            "url": entry.url,
            "required": entry.required,
            "order": entry.order,
        });
        match entry.id {
            Some(id) => match client.update(&routes::bibliography(id), &payload) {
                Ok(()) => outcome.updated += 1,
                Err(err) => outcome
                    .errors
                    .push(format!("reference {:?}: {err}", entry.title)),
            },
            None => match client.create(&routes::bibliography_create(rps_id), &payload) {
                Ok(id) => {
                    entry.id = Some(id);
                    outcome.created += 1;
                }
                Err(err) => outcome
                    .errors
                    .push(format!("reference {:?}: {err}", entry.title)),
            },
        }
    }
}

fn submit_grading_scale(client: &ApiClient, draft: &mut RpsDraft, outcome: &mut StepSubmitOutcome) {
    let rps_id = draft.rps_id;
    for row in &mut draft.grading_scale {
        if !row.has_content() {
            outcome.skipped += 1;
            continue;
        }
        let payload = json!({
            "min_score": row.min_score,
            "max_score": row.max_score,
            "letter": row.letter,
            "grade_point": row.grade_point,
            "passing": row.passing,
        });
        match row.id {
            Some(id) => match client.update(&routes::grading_scale(id), &payload) {
                Ok(()) => outcome.updated += 1,
                Err(err) => outcome
                    .errors
                    .push(format!("grade {}: {err}", row.letter)),
            },
            None => match client.create(&routes::grading_scale_create(rps_id), &payload) {
                Ok(id) => {
                    row.id = Some(id);
                    outcome.created += 1;
                }
                Err(err) => outcome
                    .errors
                    .push(format!("grade {}: {err}", row.letter)),
            },
        }
    }
}

/// Give code-less outcomes the next free `CPMK-NN` code before submission.
fn assign_cpmk_codes(draft: &mut RpsDraft) {
    let mut next = draft.next_cpmk_number();
    for cpmk in &mut draft.cpmks {
        if cpmk.has_content() && cpmk.code.trim().is_empty() {
            cpmk.code = format!("CPMK-{next:02}");
            next += 1;
        }
    }
}

fn assign_sub_cpmk_codes(draft: &mut RpsDraft) {
    let mut next = draft.next_sub_cpmk_number();
    for sub in &mut draft.sub_cpmks {
        if sub.has_content() && sub.code.trim().is_empty() {
            sub.code = format!("SUB-CPMK-{next:02}");
            next += 1;
        }
    }
}

/// Run validation for one step (or all steps) without touching the network.
pub fn run_validate(workdir: PathBuf, step: Option<Step>, json: bool) -> Result<()> {
    let paths = WorkdirPaths::new(workdir);
    let draft = draft::load_draft(&paths)?;
    let steps: Vec<Step> = match step {
        Some(step) => vec![step],
        None => draft::STEP_ORDER.to_vec(),
    };
    let messages: Vec<_> = steps
        .iter()
        .flat_map(|step| validate::validate_step(&draft, *step))
        .collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
    } else if messages.is_empty() {
        println!("no findings");
    } else {
        for message in &messages {
            println!("{} [{}] {}", message.severity, message.step, message.render());
        }
    }
    let blocking = messages
        .iter()
        .filter(|message| message.severity == Severity::Error)
        .count();
    if blocking > 0 {
        return Err(anyhow::anyhow!("{blocking} blocking issue(s)"));
    }
    Ok(())
}

/// Validate and submit one step without advancing the wizard.
pub fn run_push(workdir: PathBuf, step: Option<Step>) -> Result<()> {
    let mut ctx = WorkflowContext::load(workdir)?;
    let step = step.unwrap_or(ctx.draft.wizard.active_step);

    let messages = validate::validate_step(&ctx.draft, step);
    for message in &messages {
        if message.severity == Severity::Warning {
            println!("warning: {}", message.render());
        }
    }
    if validate::has_blocking(&messages) {
        for message in &messages {
            if message.severity == Severity::Error {
                println!("error: {}", message.render());
            }
        }
        let blocking = messages
            .iter()
            .filter(|message| message.severity == Severity::Error)
            .count() as u32;
        draft::append_history(
            &ctx.paths,
            &HistoryEntry::now("push", Some(step), false, blocking)?,
        )?;
        return Err(anyhow::anyhow!(
            "step {step} has {blocking} blocking issue(s); push aborted"
        ));
    }

    let client = ctx.client();
    let outcome = submit_step(&client, &mut ctx.draft, step);
    ctx.persist_tokens(&client)?;
    ctx.save_draft()?;
    draft::append_history(
        &ctx.paths,
        &HistoryEntry::now("push", Some(step), outcome.ok(), outcome.errors.len() as u32)?,
    )?;

    println!(
        "step {}: {} created, {} updated, {} deleted, {} skipped",
        step, outcome.created, outcome.updated, outcome.deleted, outcome.skipped
    );
    if !outcome.ok() {
        for error in &outcome.errors {
            println!("error: {error}");
        }
        return Err(anyhow::anyhow!(
            "{} submission error(s) on step {step}; draft retains failed entries",
            outcome.errors.len()
        ));
    }
    Ok(())
}
