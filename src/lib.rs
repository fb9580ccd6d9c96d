//! Core library for the `rps` authoring workflow.
//!
//! The wizard's in-memory document lives as a workdir-owned artifact
//! (`rps/draft.json`) that commands load, validate, reconcile against the
//! remote store, and write back.
pub mod api;
pub mod cli;
pub mod draft;
pub mod progress;
pub mod session;
pub mod validate;
pub mod workflow;
