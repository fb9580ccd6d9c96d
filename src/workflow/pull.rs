//! Load the remote document and reference data into a local draft.
use anyhow::Result;
use std::path::PathBuf;
use uuid::Uuid;

use crate::api::{routes, ApiClient, ApiError, RpsDocument, SubCpmkDto};
use crate::draft::{
    self, AchievementAnalysis, Assignment, BibliographyEntry, CourseRef, Cpmk, CplOutcome,
    GradingRow, HistoryEntry, RpsDraft, SubCpmk, WeeklyPlan, WorkdirPaths,
    DEFAULT_DURATION_MINUTES, DEFAULT_TEACHING_METHOD, DEFAULT_WEIGHT_PERCENT, MAX_TEACHING_WEEKS,
};
use crate::progress;
use crate::session::AuthState;

/// Fetch one RPS with its reference data and flatten it into a draft.
///
/// Sub-outcomes are fetched with one list call per CPMK, in document order.
/// Optional remote fields receive documented defaults; each substitution is
/// counted so the status summary can surface how much was filled in.
pub fn load_document(client: &ApiClient, rps_id: u64) -> Result<RpsDraft, ApiError> {
    let document: RpsDocument = client.get(&routes::rps(rps_id))?;
    let courses: Vec<CourseRef> = client.list(&routes::courses())?;
    let outcomes: Vec<CplOutcome> = client.list(&routes::outcomes())?;

    let mut draft = RpsDraft::new(rps_id);
    draft.references.courses = courses;
    draft.references.outcomes = outcomes;

    draft.info.course_id = document.course_id;
    draft.info.course_name = document.course_name.unwrap_or_default();
    draft.info.academic_year = document.academic_year.unwrap_or_default();
    draft.info.semester = document.semester.unwrap_or_default();
    draft.info.author_id = document.author_id;
    draft.info.author_name = document.author_name.unwrap_or_default();
    draft.info.coordinator_id = document.coordinator_id;
    draft.info.coordinator_name = document.coordinator_name.unwrap_or_default();
    draft.info.head_of_program_id = document.head_of_program_id;
    draft.info.head_of_program_name = document.head_of_program_name.unwrap_or_default();
    draft.info.description = document.description.unwrap_or_default();
    draft.info.learning_outcomes = document.learning_outcomes.unwrap_or_default();
    draft.info.teaching_methods = document.teaching_methods;
    draft.info.media = document.media;
    draft.info.status = document.status.unwrap_or_default();

    let mut defaulted = 0u32;

    for (index, dto) in document.cpmks.iter().enumerate() {
        let local_id = Uuid::new_v4();
        draft.cpmks.push(Cpmk {
            local_id,
            id: Some(dto.id),
            code: dto.code.clone().unwrap_or_default(),
            description: dto.description.clone().unwrap_or_default(),
            cpl_ids: dto.cpl_ids.clone(),
            order: dto.order.unwrap_or(index as u32 + 1),
        });
        let subs: Vec<SubCpmkDto> = client.list(&routes::sub_cpmk_list(dto.id))?;
        for (sub_index, sub) in subs.into_iter().enumerate() {
            draft.sub_cpmks.push(SubCpmk {
                local_id: Uuid::new_v4(),
                id: Some(sub.id),
                cpmk_local_id: local_id,
                code: sub.code.unwrap_or_default(),
                description: sub.description.unwrap_or_default(),
                order: sub.order.unwrap_or(sub_index as u32 + 1),
            });
        }
    }

    for dto in document.weekly_plans {
        let teaching_method = match dto.teaching_method {
            Some(method) if !method.trim().is_empty() => method,
            _ => {
                defaulted += 1;
                DEFAULT_TEACHING_METHOD.to_string()
            }
        };
        let duration_minutes = match dto.duration_minutes {
            Some(minutes) => minutes,
            None => {
                defaulted += 1;
                DEFAULT_DURATION_MINUTES
            }
        };
        let weight_percent = match dto.weight_percent {
            Some(weight) => weight,
            None => {
                defaulted += 1;
                DEFAULT_WEIGHT_PERCENT
            }
        };
        draft.weekly_plans.push(WeeklyPlan {
            local_id: Uuid::new_v4(),
            id: dto.id,
            week: dto.week,
            sub_cpmk_id: dto.sub_cpmk_id,
            topic: dto.topic.unwrap_or_default(),
            sub_topics: dto.sub_topics,
            teaching_method,
            duration_minutes,
            assessment_technique: dto.assessment_technique.unwrap_or_default(),
            assessment_criteria: dto.assessment_criteria.unwrap_or_default(),
            weight_percent,
        });
    }
    pad_weekly_plans(&mut draft.weekly_plans);

    for (index, dto) in document.assignments.into_iter().enumerate() {
        let weight_percent = match dto.weight_percent {
            Some(weight) => weight,
            None => {
                defaulted += 1;
                DEFAULT_WEIGHT_PERCENT
            }
        };
        draft.assignments.push(Assignment {
            local_id: Uuid::new_v4(),
            id: dto.id,
            sequence: dto.sequence.unwrap_or(index as u32 + 1),
            title: dto.title.unwrap_or_default(),
            sub_cpmk_id: dto.sub_cpmk_id,
            success_indicator: dto.success_indicator.unwrap_or_default(),
            deadline_week: dto.deadline_week,
            mode: dto.mode,
            instructions: dto.instructions.unwrap_or_default(),
            deliverable: dto.deliverable.unwrap_or_default(),
            grading_criteria: dto.grading_criteria.unwrap_or_default(),
            grading_technique: dto.grading_technique.unwrap_or_default(),
            weight_percent,
            references: dto.references,
        });
    }

    for dto in document.analyses {
        draft.analyses.push(AchievementAnalysis {
            local_id: Uuid::new_v4(),
            id: dto.id,
            week_start: dto.week_start.unwrap_or(1),
            week_end: dto.week_end,
            cpl_id: dto.cpl_id,
            cpmk_ids: dto.cpmk_ids,
            sub_cpmk_ids: dto.sub_cpmk_ids,
            topic: dto.topic.unwrap_or_default(),
            assessment_type: dto.assessment_type.unwrap_or_default(),
            weight_percent: dto.weight_percent.unwrap_or(DEFAULT_WEIGHT_PERCENT),
        });
    }

    for (index, dto) in document.bibliography.into_iter().enumerate() {
        draft.bibliography.push(BibliographyEntry {
            local_id: Uuid::new_v4(),
            id: dto.id,
            title: dto.title.unwrap_or_default(),
            author: dto.author.unwrap_or_default(),
            year: dto.year,
            publisher: dto.publisher.unwrap_or_default(),
            kind: dto.kind.unwrap_or_default(),
            isbn: dto.isbn.unwrap_or_default(),
            pages: dto.pages.unwrap_or_default(),
            url: dto.url.unwrap_or_default(),
            required: dto.required.unwrap_or(false),
            order: dto.order.unwrap_or(index as u32 + 1),
        });
    }

    for dto in document.grading_scale {
        draft.grading_scale.push(GradingRow {
            local_id: Uuid::new_v4(),
            id: dto.id,
            min_score: dto.min_score.unwrap_or(0.0),
            max_score: dto.max_score.unwrap_or(0.0),
            letter: dto.letter.unwrap_or_default(),
            grade_point: dto.grade_point.unwrap_or(0.0),
            passing: dto.passing.unwrap_or(false),
        });
    }

    if defaulted > 0 {
        tracing::debug!(defaulted, "substituted defaults for missing remote fields");
    }
    draft.wizard.defaulted_fields = defaulted;
    draft.wizard.completed_steps = progress::completed_steps(&draft);
    draft.wizard.active_step = progress::first_incomplete_step(&draft.wizard.completed_steps);
    Ok(draft)
}

/// Pad the weekly grid with local placeholders so every teaching week is
/// editable. Placeholders carry no topic and are skipped at submit time.
fn pad_weekly_plans(plans: &mut Vec<WeeklyPlan>) {
    for week in 1..=MAX_TEACHING_WEEKS {
        if !plans.iter().any(|plan| plan.week == week) {
            plans.push(WeeklyPlan {
                local_id: Uuid::new_v4(),
                id: None,
                week,
                sub_cpmk_id: None,
                topic: String::new(),
                sub_topics: Vec::new(),
                teaching_method: DEFAULT_TEACHING_METHOD.to_string(),
                duration_minutes: DEFAULT_DURATION_MINUTES,
                assessment_technique: String::new(),
                assessment_criteria: String::new(),
                weight_percent: DEFAULT_WEIGHT_PERCENT,
            });
        }
    }
    plans.sort_by_key(|plan| plan.week);
}

/// Fetch a document into a fresh draft artifact.
pub fn run_pull(workdir: PathBuf, rps_id: u64, force: bool) -> Result<()> {
    let paths = WorkdirPaths::new(workdir);
    if paths.draft_path().is_file() && !force {
        return Err(anyhow::anyhow!(
            "draft already exists at {} (use --force to overwrite local edits)",
            paths.draft_path().display()
        ));
    }
    let mut session = AuthState::load(&paths)?.require(paths.root())?;
    let client = super::context::client_for(&session);

    let draft = match load_document(&client, rps_id) {
        Ok(draft) => draft,
        Err(ApiError::NotFound { .. }) => {
            return Err(anyhow::anyhow!("RPS {rps_id} not found"));
        }
        Err(err) => return Err(anyhow::Error::new(err).context(format!("load RPS {rps_id}"))),
    };
    super::context::persist_session_tokens(&paths, &mut session, &client)?;
    draft::write_draft(&paths, &draft)?;
    draft::append_history(&paths, &HistoryEntry::now("pull", None, true, 0)?)?;

    tracing::info!(rps_id, "pulled document");
    println!(
        "pulled RPS {} into {} ({} outcomes, {} weeks, landing step: {})",
        rps_id,
        paths.draft_path().display(),
        draft.cpmks.len(),
        draft.weekly_plans.len(),
        draft.wizard.active_step
    );
    if draft.wizard.defaulted_fields > 0 {
        println!(
            "note: {} field(s) filled with defaults; review before pushing",
            draft.wizard.defaulted_fields
        );
    }
    Ok(())
}
