//! Command orchestration for the authoring workflow.
//!
//! Each command is intentionally small: load artifacts, run one workflow
//! operation, persist, append history. Core operations are plain functions
//! over `ApiClient` + `RpsDraft` so tests can drive them against a fake
//! transport.
mod context;
mod login;
mod pull;
mod status;
mod steps;
mod submit;
mod view;

pub use context::WorkflowContext;
pub use login::{run_login, run_logout};
pub use pull::{load_document, run_pull};
pub use status::{build_status_summary, run_status, Decision, NextAction, StatusSummary, StepStatus};
pub use steps::{advance_step, finalize, run_finalize, run_goto, run_next, run_prev};
pub use submit::{run_push, run_validate, submit_step, StepSubmitOutcome};
pub use view::run_show;
