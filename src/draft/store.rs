//! Draft artifact persistence.
use anyhow::{anyhow, Context, Result};
use std::fs;

use super::{RpsDraft, WorkdirPaths, DRAFT_SCHEMA_VERSION};

/// Load the draft from `rps/draft.json`, checking its schema version.
pub fn load_draft(paths: &WorkdirPaths) -> Result<RpsDraft> {
    let path = paths.draft_path();
    let bytes = fs::read(&path).with_context(|| format!("read draft {}", path.display()))?;
    let draft: RpsDraft = serde_json::from_slice(&bytes).context("parse draft JSON")?;
    if draft.schema_version != DRAFT_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported draft schema_version {} (expected {})",
            draft.schema_version,
            DRAFT_SCHEMA_VERSION
        ));
    }
    Ok(draft)
}

/// Persist the draft to disk in a stable JSON format.
pub fn write_draft(paths: &WorkdirPaths, draft: &RpsDraft) -> Result<()> {
    let path = paths.draft_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create rps dir")?;
    }
    let text = serde_json::to_string_pretty(draft).context("serialize draft")?;
    fs::write(&path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
