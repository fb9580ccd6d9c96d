//! Rule sets for the individual wizard steps.
use regex::Regex;

use super::{grading, ValidationMessage};
use crate::draft::{RpsDraft, Step, MAX_TEACHING_WEEKS};

pub(super) fn validate_info(draft: &RpsDraft) -> Vec<ValidationMessage> {
    let mut messages = Vec::new();
    let info = &draft.info;
    if info.course_id.is_none() {
        messages.push(ValidationMessage::error(
            Step::Info,
            None,
            "no course selected",
        ));
    }
    if info.academic_year.trim().is_empty() {
        messages.push(ValidationMessage::error(
            Step::Info,
            None,
            "academic year is empty",
        ));
    } else if !academic_year_pattern().is_match(info.academic_year.trim()) {
        messages.push(ValidationMessage::warning(
            Step::Info,
            None,
            format!(
                "academic year {:?} does not look like YYYY/YYYY",
                info.academic_year.trim()
            ),
        ));
    }
    if info.description.trim().is_empty() {
        messages.push(ValidationMessage::error(
            Step::Info,
            None,
            "course description is empty",
        ));
    }
    messages
}

fn academic_year_pattern() -> Regex {
    Regex::new(r"^\d{4}/\d{4}$").expect("static academic year pattern compiles")
}

pub(super) fn validate_cpmk(draft: &RpsDraft) -> Vec<ValidationMessage> {
    let mut messages = Vec::new();
    if draft.cpmks.is_empty() {
        messages.push(ValidationMessage::error(
            Step::Cpmk,
            None,
            "at least one CPMK is required",
        ));
        return messages;
    }
    for (index, cpmk) in draft.cpmks.iter().enumerate() {
        let context = entry_context(&cpmk.code, "CPMK", index);
        if cpmk.description.trim().is_empty() {
            messages.push(ValidationMessage::error(
                Step::Cpmk,
                Some(context.clone()),
                "description is empty",
            ));
        }
        // Surfaced separately from the content rule so the mapping gap is
        // visible even when the description is fine.
        if cpmk.cpl_ids.is_empty() {
            messages.push(ValidationMessage::error(
                Step::Cpmk,
                Some(context),
                "not mapped to any program outcome (CPL)",
            ));
        }
    }
    messages
}

pub(super) fn validate_weekly_plan(draft: &RpsDraft) -> Vec<ValidationMessage> {
    let mut messages = Vec::new();
    let filled = draft
        .weekly_plans
        .iter()
        .filter(|week| week.has_content())
        .count();
    if filled == 0 {
        messages.push(ValidationMessage::error(
            Step::WeeklyPlan,
            None,
            "at least one week needs a topic",
        ));
        return messages;
    }

    let mut weight_total = 0.0;
    for week in &draft.weekly_plans {
        let context = format!("week {}", week.week);
        if !week.has_content() {
            messages.push(ValidationMessage::warning(
                Step::WeeklyPlan,
                Some(context),
                "no topic yet; this week will not be saved",
            ));
            continue;
        }
        if week.sub_cpmk_id.is_none() {
            messages.push(ValidationMessage::error(
                Step::WeeklyPlan,
                Some(context.clone()),
                "no sub-CPMK linked",
            ));
        }
        if week.teaching_method.trim().is_empty() {
            messages.push(ValidationMessage::error(
                Step::WeeklyPlan,
                Some(context.clone()),
                "teaching method is empty",
            ));
        }
        if week.duration_minutes == 0 {
            messages.push(ValidationMessage::error(
                Step::WeeklyPlan,
                Some(context.clone()),
                "duration must be greater than zero",
            ));
        }
        if week.weight_percent < 0.0 {
            messages.push(ValidationMessage::error(
                Step::WeeklyPlan,
                Some(context),
                "weight cannot be negative",
            ));
        }
        weight_total += week.weight_percent;
    }
    if weight_total > 100.0 {
        messages.push(ValidationMessage::warning(
            Step::WeeklyPlan,
            None,
            format!("weekly weights sum to {weight_total:.1}% (over 100%)"),
        ));
    }
    messages
}

pub(super) fn validate_assignments(draft: &RpsDraft) -> Vec<ValidationMessage> {
    let mut messages = Vec::new();
    let titled: Vec<_> = draft
        .assignments
        .iter()
        .enumerate()
        .filter(|(_, task)| task.has_content())
        .collect();
    if titled.is_empty() {
        return messages;
    }

    let mut weight_total = 0.0;
    for (index, task) in titled {
        let context = entry_context(&task.title, "assignment", index);
        if task.mode.is_none() {
            messages.push(ValidationMessage::error(
                Step::Assignments,
                Some(context.clone()),
                "individual/group type not chosen",
            ));
        }
        if task.weight_percent <= 0.0 {
            messages.push(ValidationMessage::error(
                Step::Assignments,
                Some(context.clone()),
                "weight must be greater than zero",
            ));
        }
        match task.deadline_week {
            Some(week) if (1..=MAX_TEACHING_WEEKS).contains(&week) => {}
            Some(week) => messages.push(ValidationMessage::error(
                Step::Assignments,
                Some(context),
                format!("deadline week {week} is outside 1..={MAX_TEACHING_WEEKS}"),
            )),
            None => messages.push(ValidationMessage::error(
                Step::Assignments,
                Some(context),
                "deadline week not set",
            )),
        }
        weight_total += task.weight_percent;
    }
    if weight_total > 100.0 {
        messages.push(ValidationMessage::warning(
            Step::Assignments,
            None,
            format!("assignment weights sum to {weight_total:.1}% (over 100%)"),
        ));
    }
    messages
}

pub(super) fn validate_bibliography(draft: &RpsDraft) -> Vec<ValidationMessage> {
    let mut messages = Vec::new();
    for (index, entry) in draft.bibliography.iter().enumerate() {
        if entry.has_content() && entry.author.trim().is_empty() {
            messages.push(ValidationMessage::warning(
                Step::Bibliography,
                Some(entry_context(&entry.title, "entry", index)),
                "no author recorded",
            ));
        }
    }
    messages
}

pub(super) fn validate_grading_scale(draft: &RpsDraft) -> Vec<ValidationMessage> {
    let mut messages = Vec::new();
    let rows: Vec<_> = draft
        .grading_scale
        .iter()
        .filter(|row| row.has_content())
        .collect();
    for row in &rows {
        if row.min_score > row.max_score {
            messages.push(ValidationMessage::error(
                Step::GradingScale,
                Some(row.letter.trim().to_string()),
                format!(
                    "min score {} exceeds max score {}",
                    row.min_score, row.max_score
                ),
            ));
        }
    }
    for (left, right) in grading::find_overlaps(&rows) {
        messages.push(ValidationMessage::error(
            Step::GradingScale,
            None,
            format!(
                "ranges for {} and {} overlap",
                describe_row(rows[left]),
                describe_row(rows[right])
            ),
        ));
    }
    messages
}

fn describe_row(row: &crate::draft::GradingRow) -> String {
    format!("{} ({}-{})", row.letter.trim(), row.min_score, row.max_score)
}

/// Prefer the entry's own code/title as context, falling back to its position.
fn entry_context(label: &str, kind: &str, index: usize) -> String {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        format!("{kind} #{}", index + 1)
    } else {
        trimmed.to_string()
    }
}
