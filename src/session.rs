//! Explicit session state for the workflow.
//!
//! Auth state is an injected artifact rather than ambient global storage: a
//! command either loads an authenticated session from the workdir or refuses
//! to touch the network.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::draft::{WorkdirPaths, SESSION_SCHEMA_VERSION};

/// Persisted authenticated session.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Session {
    pub schema_version: u32,
    /// Versioned API base, e.g. `http://localhost:8080/api/v1`.
    pub api_url: String,
    pub token: String,
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// Auth state loaded at command start.
#[derive(Debug, Clone)]
pub enum AuthState {
    Authenticated(Session),
    Unauthenticated,
}

impl AuthState {
    /// Load auth state from `rps/session.json`; a missing file is simply
    /// unauthenticated, not an error.
    pub fn load(paths: &WorkdirPaths) -> Result<AuthState> {
        let path = paths.session_path();
        if !path.is_file() {
            return Ok(AuthState::Unauthenticated);
        }
        let bytes = fs::read(&path).with_context(|| format!("read session {}", path.display()))?;
        let session: Session = serde_json::from_slice(&bytes).context("parse session JSON")?;
        if session.schema_version != SESSION_SCHEMA_VERSION {
            return Err(anyhow!(
                "unsupported session schema_version {} (log in again)",
                session.schema_version
            ));
        }
        Ok(AuthState::Authenticated(session))
    }

    /// Unwrap the authenticated session or fail with a login hint.
    pub fn require(self, workdir: &std::path::Path) -> Result<Session> {
        match self {
            AuthState::Authenticated(session) => Ok(session),
            AuthState::Unauthenticated => Err(anyhow!(
                "no active session (run `rps login --workdir {} --token ... --refresh-token ...` first)",
                workdir.display()
            )),
        }
    }
}

/// Persist a session to `rps/session.json`.
pub fn write_session(paths: &WorkdirPaths, session: &Session) -> Result<()> {
    let path = paths.session_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create rps dir")?;
    }
    let text = serde_json::to_string_pretty(session).context("serialize session")?;
    fs::write(&path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Remove the persisted session, if any.
pub fn clear_session(paths: &WorkdirPaths) -> Result<()> {
    let path = paths.session_path();
    if path.is_file() {
        fs::remove_file(&path).with_context(|| format!("remove {}", path.display()))?;
    }
    Ok(())
}
