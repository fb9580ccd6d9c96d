//! Typed paths into a workdir layout.
//!
//! Centralizing path construction keeps file access consistent across the
//! workflow and prevents drift when the layout evolves.
use std::path::{Path, PathBuf};

/// Convenience wrapper for locating workdir artifacts.
#[derive(Debug, Clone)]
pub struct WorkdirPaths {
    root: PathBuf,
}

impl WorkdirPaths {
    /// Create a new path helper rooted at the working directory.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Return the workdir root used for path derivation.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the `rps/` artifact directory path.
    pub fn rps_dir(&self) -> PathBuf {
        self.root.join("rps")
    }

    /// Return the `rps/draft.json` path.
    pub fn draft_path(&self) -> PathBuf {
        self.rps_dir().join("draft.json")
    }

    /// Return the `rps/session.json` path.
    pub fn session_path(&self) -> PathBuf {
        self.rps_dir().join("session.json")
    }

    /// Return the `rps/history.jsonl` path.
    pub fn history_path(&self) -> PathBuf {
        self.rps_dir().join("history.jsonl")
    }
}
