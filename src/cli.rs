//! CLI argument parsing for the RPS authoring workflow.
//!
//! The CLI is intentionally thin: it wires the step machine without embedding
//! policy, so the same core logic is reusable from tests and other frontends.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::draft::Step;

/// Root CLI entrypoint for the authoring workflow.
///
/// Keeping a single `RootArgs` type makes command routing obvious and avoids
/// hidden defaults in subcommand constructors.
#[derive(Parser, Debug)]
#[command(
    name = "rps",
    version,
    about = "Step-by-step authoring workflow for RPS course plans",
    after_help = "Commands:\n  login --workdir <dir> --api-url <url> --token <t> --refresh-token <t>  Store a session\n  pull --workdir <dir> --rps <id>     Fetch the document into a local draft\n  status --workdir <dir>              Summarize progress and next action\n  validate --workdir <dir>            Run step validation offline\n  next --workdir <dir>                Submit the active step and advance\n  push --workdir <dir>                Submit the active step without advancing\n  finalize --workdir <dir>            Conclude the workflow from the last step\n  show --workdir <dir> --rps <id>     Read-only view of the remote document\n\nExamples:\n  rps pull --workdir /tmp/algo-rps --rps 42\n  rps status --workdir /tmp/algo-rps --json\n  rps goto --workdir /tmp/algo-rps --step weekly_plan\n  rps next --workdir /tmp/algo-rps\n  rps finalize --workdir /tmp/algo-rps --force",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level workflow commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Login(LoginArgs),
    Logout(LogoutArgs),
    Pull(PullArgs),
    Status(StatusArgs),
    Validate(ValidateArgs),
    Push(PushArgs),
    Next(NextArgs),
    Prev(PrevArgs),
    Goto(GotoArgs),
    Finalize(FinalizeArgs),
    Show(ShowArgs),
}

/// Login command inputs; tokens come from the institutional SSO flow.
#[derive(Parser, Debug)]
#[command(about = "Store an authenticated session in the workdir")]
pub struct LoginArgs {
    /// Workdir holding draft, session, and history artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub workdir: PathBuf,

    /// Versioned API base, e.g. https://siakad.example.ac.id/api/v1
    #[arg(long, value_name = "URL")]
    pub api_url: String,

    /// Access token
    #[arg(long, value_name = "TOKEN")]
    pub token: String,

    /// Refresh token used on access-token expiry
    #[arg(long, value_name = "TOKEN")]
    pub refresh_token: String,

    /// Optional display name recorded in the session
    #[arg(long, value_name = "NAME")]
    pub user: Option<String>,
}

#[derive(Parser, Debug)]
#[command(about = "Drop the stored session")]
pub struct LogoutArgs {
    /// Workdir holding draft, session, and history artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub workdir: PathBuf,
}

/// Pull command inputs for seeding a local draft.
#[derive(Parser, Debug)]
#[command(about = "Fetch an RPS document into a local draft")]
pub struct PullArgs {
    /// Workdir holding draft, session, and history artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub workdir: PathBuf,

    /// Server id of the RPS record to author
    #[arg(long, value_name = "ID")]
    pub rps: u64,

    /// Overwrite an existing local draft
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Summarize draft progress and next action")]
pub struct StatusArgs {
    /// Workdir holding draft, session, and history artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub workdir: PathBuf,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Run step validation against the local draft")]
pub struct ValidateArgs {
    /// Workdir holding draft, session, and history artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub workdir: PathBuf,

    /// Restrict validation to one step (default: all steps)
    #[arg(long, value_name = "STEP")]
    pub step: Option<Step>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Submit one step without advancing the wizard")]
pub struct PushArgs {
    /// Workdir holding draft, session, and history artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub workdir: PathBuf,

    /// Step to submit (default: the active step)
    #[arg(long, value_name = "STEP")]
    pub step: Option<Step>,
}

#[derive(Parser, Debug)]
#[command(about = "Validate, submit, and advance from the active step")]
pub struct NextArgs {
    /// Workdir holding draft, session, and history artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub workdir: PathBuf,
}

#[derive(Parser, Debug)]
#[command(about = "Move back one step without submitting")]
pub struct PrevArgs {
    /// Workdir holding draft, session, and history artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub workdir: PathBuf,
}

#[derive(Parser, Debug)]
#[command(about = "Jump directly to a step")]
pub struct GotoArgs {
    /// Workdir holding draft, session, and history artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub workdir: PathBuf,

    /// Target step, e.g. weekly_plan
    #[arg(long, value_name = "STEP")]
    pub step: Step,
}

#[derive(Parser, Debug)]
#[command(about = "Conclude the workflow from the last step")]
pub struct FinalizeArgs {
    /// Workdir holding draft, session, and history artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub workdir: PathBuf,

    /// Conclude even with outstanding submission errors
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Read-only view of the remote document")]
pub struct ShowArgs {
    /// Workdir holding draft, session, and history artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub workdir: PathBuf,

    /// RPS id to view (default: the local draft's id)
    #[arg(long, value_name = "ID")]
    pub rps: Option<u64>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}
