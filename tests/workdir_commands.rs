//! Offline commands against real workdir artifacts.
use std::fs;
use tempfile::TempDir;

use rps_author::draft::{self, RpsDraft, Step, WorkdirPaths};
use rps_author::session::{self, Session};
use rps_author::workflow::{run_goto, run_logout, run_prev, run_validate};

fn workdir_with_draft(active: Step) -> (TempDir, WorkdirPaths) {
    let dir = TempDir::new().unwrap();
    let paths = WorkdirPaths::new(dir.path().to_path_buf());
    session::write_session(
        &paths,
        &Session {
            schema_version: 1,
            api_url: "http://localhost:9".to_string(),
            token: "tok-1".to_string(),
            refresh_token: "ref-1".to_string(),
            user: None,
        },
    )
    .unwrap();
    let mut draft = RpsDraft::new(42);
    draft.wizard.active_step = active;
    draft::write_draft(&paths, &draft).unwrap();
    (dir, paths)
}

#[test]
fn prev_and_goto_move_without_network_access() {
    // The session points at a dead port; navigation must never dial it.
    let (_dir, paths) = workdir_with_draft(Step::WeeklyPlan);

    run_prev(paths.root().to_path_buf()).unwrap();
    let draft = draft::load_draft(&paths).unwrap();
    assert_eq!(draft.wizard.active_step, Step::SubCpmk);

    run_goto(paths.root().to_path_buf(), Step::Bibliography).unwrap();
    let draft = draft::load_draft(&paths).unwrap();
    assert_eq!(draft.wizard.active_step, Step::Bibliography);
}

#[test]
fn prev_from_the_first_step_fails_cleanly() {
    let (_dir, paths) = workdir_with_draft(Step::Info);
    let result = run_prev(paths.root().to_path_buf());
    assert!(result.is_err());
    // The draft is untouched.
    let draft = draft::load_draft(&paths).unwrap();
    assert_eq!(draft.wizard.active_step, Step::Info);
}

#[test]
fn navigation_is_recorded_in_history() {
    let (_dir, paths) = workdir_with_draft(Step::Cpmk);
    run_goto(paths.root().to_path_buf(), Step::Analysis).unwrap();

    let history = fs::read_to_string(paths.history_path()).unwrap();
    let lines: Vec<&str> = history.lines().collect();
    assert_eq!(lines.len(), 1);
    let entry: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(entry["command"].as_str(), Some("goto"));
    assert_eq!(entry["step"].as_str(), Some("analysis"));
    assert_eq!(entry["success"].as_bool(), Some(true));
}

#[test]
fn validate_blocks_on_an_empty_draft_without_a_session() {
    let dir = TempDir::new().unwrap();
    let paths = WorkdirPaths::new(dir.path().to_path_buf());
    draft::write_draft(&paths, &RpsDraft::new(42)).unwrap();

    // No session.json in the workdir; validation is purely local.
    let result = run_validate(paths.root().to_path_buf(), None, false);
    assert!(result.is_err());

    let result = run_validate(paths.root().to_path_buf(), Some(Step::Analysis), false);
    assert!(result.is_ok());
}

#[test]
fn logout_removes_the_session_artifact() {
    let (_dir, paths) = workdir_with_draft(Step::Info);
    assert!(paths.session_path().is_file());
    run_logout(paths.root().to_path_buf()).unwrap();
    assert!(!paths.session_path().is_file());
}
