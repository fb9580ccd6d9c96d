//! Workdir-owned draft artifacts for the authoring workflow.
//!
//! The draft module centralizes schema versions, path handling, and the typed
//! document container so every command reads and writes the same state.
use anyhow::{Context, Result};
use std::time::{SystemTime, UNIX_EPOCH};

/// Current schema version for `rps/draft.json`.
pub const DRAFT_SCHEMA_VERSION: u32 = 1;
/// Current schema version for `rps/session.json`.
pub const SESSION_SCHEMA_VERSION: u32 = 1;
/// Current schema version for `rps/history.jsonl`.
pub const HISTORY_SCHEMA_VERSION: u32 = 1;

/// Teaching method substituted when the remote record omits one.
pub const DEFAULT_TEACHING_METHOD: &str = "Ceramah, Diskusi";
/// Duration in minutes substituted when the remote record omits one.
pub const DEFAULT_DURATION_MINUTES: u32 = 150;
/// Weight percentage substituted when the remote record omits one.
pub const DEFAULT_WEIGHT_PERCENT: f64 = 0.0;
/// Number of teaching weeks in one semester.
pub const MAX_TEACHING_WEEKS: u32 = 16;

mod history;
mod paths;
mod store;
mod types;

pub use history::{append_history, HistoryEntry};
pub use paths::WorkdirPaths;
pub use store::{load_draft, write_draft};
pub use types::{
    AchievementAnalysis, Assignment, AssignmentMode, BibliographyEntry, BibliographyKind,
    CourseRef, Cpmk, CplOutcome, GradingRow, PendingDeletes, ReferenceData, RpsDraft, RpsInfo,
    RpsStatus, Semester, Step, SubCpmk, WeeklyPlan, WizardState, STEP_ORDER,
};

/// Current wall-clock time as milliseconds since the epoch.
pub fn now_epoch_ms() -> Result<u128> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock before epoch")?
        .as_millis())
}
