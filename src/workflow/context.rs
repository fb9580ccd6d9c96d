//! Shared command context: workdir artifacts plus an authenticated client.
use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::api::{ApiClient, TokenPair, UreqTransport};
use crate::draft::{self, RpsDraft, WorkdirPaths};
use crate::session::{self, AuthState, Session};

pub struct WorkflowContext {
    pub paths: WorkdirPaths,
    pub session: Session,
    pub draft: RpsDraft,
}

impl WorkflowContext {
    /// Load session and draft, failing with actionable hints when either is
    /// missing.
    pub fn load(workdir: PathBuf) -> Result<Self> {
        let paths = WorkdirPaths::new(workdir);
        let session = AuthState::load(&paths)?.require(paths.root())?;
        let draft = if paths.draft_path().is_file() {
            draft::load_draft(&paths)?
        } else {
            return Err(anyhow::anyhow!(
                "missing draft at {} (run `rps pull --workdir {} --rps <id>` first)",
                paths.draft_path().display(),
                paths.root().display()
            ));
        };
        Ok(Self {
            paths,
            session,
            draft,
        })
    }

    /// Build a client over the real transport for this session.
    pub fn client(&self) -> ApiClient {
        client_for(&self.session)
    }

    /// Persist tokens back to the session artifact if a refresh rotated them.
    pub fn persist_tokens(&mut self, client: &ApiClient) -> Result<()> {
        persist_session_tokens(&self.paths, &mut self.session, client)
    }

    /// Persist the draft artifact.
    pub fn save_draft(&self) -> Result<()> {
        draft::write_draft(&self.paths, &self.draft)
    }
}

pub(super) fn client_for(session: &Session) -> ApiClient {
    ApiClient::new(
        Box::new(UreqTransport::new(session.api_url.clone())),
        TokenPair {
            token: session.token.clone(),
            refresh_token: session.refresh_token.clone(),
        },
    )
}

/// Write the session artifact back when a refresh rotated the pair.
pub(super) fn persist_session_tokens(
    paths: &WorkdirPaths,
    session: &mut Session,
    client: &ApiClient,
) -> Result<()> {
    let current = client.tokens().context("read client tokens")?;
    if current.token != session.token {
        session.token = current.token;
        session.refresh_token = current.refresh_token;
        session::write_session(paths, session)?;
    }
    Ok(())
}
