//! Read-only view of the remote document. Never touches the draft artifact.
use anyhow::{anyhow, Result};
use std::path::PathBuf;

use crate::api::ApiError;
use crate::draft::{self, WorkdirPaths};
use crate::session::AuthState;

/// Fetch and print the current remote state of an RPS.
pub fn run_show(workdir: PathBuf, rps: Option<u64>, json: bool) -> Result<()> {
    let paths = WorkdirPaths::new(workdir);
    let mut session = AuthState::load(&paths)?.require(paths.root())?;
    let rps_id = match rps {
        Some(id) => id,
        None if paths.draft_path().is_file() => draft::load_draft(&paths)?.rps_id,
        None => return Err(anyhow!("no local draft; pass --rps <id>")),
    };

    let client = super::context::client_for(&session);
    let document = match super::load_document(&client, rps_id) {
        Ok(document) => document,
        Err(ApiError::NotFound { .. }) => return Err(anyhow!("RPS {rps_id} not found")),
        Err(err) => return Err(anyhow::Error::new(err).context(format!("load RPS {rps_id}"))),
    };
    super::context::persist_session_tokens(&paths, &mut session, &client)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }
    let info = &document.info;
    println!("RPS {} ({:?})", rps_id, info.status);
    println!(
        "course: {} ({}, {:?} semester)",
        info.course_name, info.academic_year, info.semester
    );
    if !info.description.trim().is_empty() {
        println!("description: {}", info.description);
    }
    println!("outcomes: {}", document.cpmks.len());
    for cpmk in &document.cpmks {
        println!("  {} {}", cpmk.code, cpmk.description);
    }
    println!("sub-outcomes: {}", document.sub_cpmks.len());
    let planned = document
        .weekly_plans
        .iter()
        .filter(|plan| plan.has_content())
        .count();
    println!("weekly plans: {planned} of {}", document.weekly_plans.len());
    println!(
        "assignments: {}",
        document
            .assignments
            .iter()
            .filter(|task| task.has_content())
            .count()
    );
    println!("analyses: {}", document.analyses.len());
    println!("bibliography: {}", document.bibliography.len());
    println!("grading rows: {}", document.grading_scale.len());
    Ok(())
}
