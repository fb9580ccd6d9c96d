//! Pure derivation of which steps already hold real content.
//!
//! Used to seed the wizard after load and to pick the landing step; the same
//! derivation backs the status summary so the two never disagree.
use std::collections::BTreeSet;

use crate::draft::{RpsDraft, Step, STEP_ORDER};

/// Whether a step's collection currently holds qualifying content.
pub fn step_has_content(draft: &RpsDraft, step: Step) -> bool {
    match step {
        Step::Info => {
            draft.info.course_id.is_some() && !draft.info.description.trim().is_empty()
        }
        Step::Cpmk => draft.cpmks.iter().any(|cpmk| cpmk.has_content()),
        Step::SubCpmk => draft.sub_cpmks.iter().any(|sub| sub.has_content()),
        Step::WeeklyPlan => draft.weekly_plans.iter().any(|week| week.has_content()),
        Step::Assignments => draft.assignments.iter().any(|task| task.has_content()),
        Step::Analysis => draft.analyses.iter().any(|row| row.has_content()),
        Step::Bibliography => draft.bibliography.iter().any(|entry| entry.has_content()),
        Step::GradingScale => draft.grading_scale.iter().any(|row| row.has_content()),
    }
}

/// Derive the set of steps that already contain real content.
pub fn completed_steps(draft: &RpsDraft) -> BTreeSet<Step> {
    STEP_ORDER
        .iter()
        .copied()
        .filter(|step| step_has_content(draft, *step))
        .collect()
}

/// First step missing from the completed set, or the last step when every
/// step already has content.
pub fn first_incomplete_step(completed: &BTreeSet<Step>) -> Step {
    STEP_ORDER
        .iter()
        .copied()
        .find(|step| !completed.contains(step))
        .unwrap_or_else(Step::last)
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
