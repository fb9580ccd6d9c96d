//! Session management commands.
use anyhow::Result;
use std::path::PathBuf;

use crate::draft::{WorkdirPaths, SESSION_SCHEMA_VERSION};
use crate::session::{self, Session};

/// Record an authenticated session in the workdir.
///
/// Token acquisition happens outside this tool (institutional SSO); the
/// command only persists the pair for later commands to use.
pub fn run_login(
    workdir: PathBuf,
    api_url: String,
    token: String,
    refresh_token: String,
    user: Option<String>,
) -> Result<()> {
    let paths = WorkdirPaths::new(workdir);
    let session = Session {
        schema_version: SESSION_SCHEMA_VERSION,
        api_url: api_url.trim_end_matches('/').to_string(),
        token,
        refresh_token,
        user,
    };
    session::write_session(&paths, &session)?;
    tracing::info!(api_url = %session.api_url, "session stored");
    println!("session stored at {}", paths.session_path().display());
    Ok(())
}

/// Drop the persisted session.
pub fn run_logout(workdir: PathBuf) -> Result<()> {
    let paths = WorkdirPaths::new(workdir);
    session::clear_session(&paths)?;
    println!("session cleared");
    Ok(())
}
