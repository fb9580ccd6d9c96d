//! Append-only history of workflow commands.
//!
//! History keeps step submissions auditable without mutating the draft.
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;

use super::{Step, WorkdirPaths, HISTORY_SCHEMA_VERSION};

/// History entry recorded after each workflow command.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub schema_version: u32,
    pub at_epoch_ms: u128,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<Step>,
    pub success: bool,
    pub errors: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HistoryEntry {
    /// Build an entry stamped with the current time.
    pub fn now(command: &str, step: Option<Step>, success: bool, errors: u32) -> Result<Self> {
        Ok(Self {
            schema_version: HISTORY_SCHEMA_VERSION,
            at_epoch_ms: super::now_epoch_ms()?,
            command: command.to_string(),
            step,
            success,
            errors,
            message: None,
        })
    }
}

/// Append a history entry as JSONL.
pub fn append_history(paths: &WorkdirPaths, entry: &HistoryEntry) -> Result<()> {
    let path = paths.history_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create rps dir")?;
    }
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;
    let line = serde_json::to_string(entry).context("serialize history entry")?;
    file.write_all(line.as_bytes())
        .with_context(|| format!("write {}", path.display()))?;
    file.write_all(b"\n")
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
