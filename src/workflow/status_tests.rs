use super::*;
use crate::draft::{Cpmk, RpsDraft, WeeklyPlan};
use std::path::Path;
use uuid::Uuid;

fn authored_draft() -> RpsDraft {
    let mut draft = RpsDraft::new(42);
    draft.info.course_id = Some(12);
    draft.info.academic_year = "2025/2026".to_string();
    draft.info.description = "Struktur data".to_string();
    draft.cpmks.push(Cpmk {
        local_id: Uuid::new_v4(),
        id: Some(1),
        code: "CPMK-01".to_string(),
        description: "Mahasiswa mampu memilih struktur data".to_string(),
        cpl_ids: vec![3],
        order: 1,
    });
    draft.weekly_plans.push(WeeklyPlan {
        local_id: Uuid::new_v4(),
        id: Some(5),
        week: 1,
        sub_cpmk_id: Some(9),
        topic: "Array dan list".to_string(),
        sub_topics: vec![],
        teaching_method: "Ceramah, Diskusi".to_string(),
        duration_minutes: 150,
        assessment_technique: String::new(),
        assessment_criteria: String::new(),
        weight_percent: 5.0,
    });
    draft
}

fn summary_of(draft: &RpsDraft) -> StatusSummary {
    build_status_summary(draft, Path::new("/tmp/w/rps/draft.json")).unwrap()
}

#[test]
fn empty_draft_is_blocked_with_edit_action() {
    let draft = RpsDraft::new(42);
    let summary = summary_of(&draft);
    assert_eq!(summary.decision, Decision::Blocked);
    match summary.next_action {
        NextAction::Edit { ref path, .. } => assert!(path.ends_with("draft.json")),
        ref other => panic!("expected edit action, got {other:?}"),
    }
    let info = &summary.steps[0];
    assert_eq!(info.step, Step::Info);
    assert!(info.blocking > 0);
}

#[test]
fn valid_unvisited_draft_is_incomplete_and_points_at_next() {
    let draft = authored_draft();
    let summary = summary_of(&draft);
    assert_eq!(summary.decision, Decision::Incomplete);
    match summary.next_action {
        NextAction::Command { ref command, .. } => assert_eq!(command, "rps next"),
        ref other => panic!("expected command action, got {other:?}"),
    }
}

#[test]
fn fully_visited_draft_is_complete_and_points_at_finalize() {
    let mut draft = authored_draft();
    for step in crate::draft::STEP_ORDER {
        draft.wizard.completed_steps.insert(step);
    }
    let summary = summary_of(&draft);
    assert_eq!(summary.decision, Decision::Complete);
    match summary.next_action {
        NextAction::Command { ref command, .. } => assert_eq!(command, "rps finalize"),
        ref other => panic!("expected command action, got {other:?}"),
    }
}

#[test]
fn recorded_submit_errors_block_with_push_retry_action() {
    let mut draft = authored_draft();
    draft
        .wizard
        .step_errors
        .insert(Step::Cpmk, vec!["CPMK-01: server said no".to_string()]);
    let summary = summary_of(&draft);
    assert_eq!(summary.decision, Decision::Blocked);
    match summary.next_action {
        NextAction::Command { ref command, .. } => {
            assert_eq!(command, "rps push --step cpmk");
        }
        ref other => panic!("expected command action, got {other:?}"),
    }
    let cpmk = &summary.steps[Step::Cpmk.position()];
    assert_eq!(cpmk.submit_errors, 1);
}

#[test]
fn weight_totals_count_only_rows_with_content() {
    let mut draft = authored_draft();
    draft.weekly_plans.push(WeeklyPlan {
        local_id: Uuid::new_v4(),
        id: None,
        week: 2,
        sub_cpmk_id: None,
        topic: String::new(),
        sub_topics: vec![],
        teaching_method: String::new(),
        duration_minutes: 150,
        assessment_technique: String::new(),
        assessment_criteria: String::new(),
        weight_percent: 50.0,
    });
    let summary = summary_of(&draft);
    assert!((summary.weekly_weight_total - 5.0).abs() < f64::EPSILON);
}

#[test]
fn defaulted_fields_surface_as_a_warning() {
    let mut draft = authored_draft();
    draft.wizard.defaulted_fields = 3;
    let summary = summary_of(&draft);
    assert!(summary
        .warnings
        .iter()
        .any(|warning| warning.contains("3 field(s)")));
}
