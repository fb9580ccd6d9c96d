//! Wire shapes for the backend's JSON envelopes and documents.
//!
//! Optional fields stay `Option` here; the load path substitutes documented
//! defaults when flattening into the draft.
use serde::Deserialize;

use crate::draft::{AssignmentMode, BibliographyKind, RpsStatus, Semester};

/// Uniform response envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "default_none")]
    pub data: Option<T>,
}

fn default_none<T>() -> Option<T> {
    None
}

/// List payload with pagination metadata.
#[derive(Debug, Deserialize)]
pub struct ListData<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub total_pages: u32,
}

/// Create responses carry the server-assigned identity.
#[derive(Debug, Deserialize)]
pub struct Created {
    pub id: u64,
}

/// Payload of the refresh-token exchange.
#[derive(Debug, Deserialize)]
pub struct RefreshedTokens {
    pub token: String,
    pub refresh_token: String,
}

/// Root document as returned by `GET /rps/{id}`, with nested collections.
///
/// Sub-outcomes are not nested here; they require one list request per CPMK.
#[derive(Debug, Deserialize)]
pub struct RpsDocument {
    pub id: u64,
    #[serde(default)]
    pub course_id: Option<u64>,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub academic_year: Option<String>,
    #[serde(default)]
    pub semester: Option<Semester>,
    #[serde(default)]
    pub author_id: Option<u64>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub coordinator_id: Option<u64>,
    #[serde(default)]
    pub coordinator_name: Option<String>,
    #[serde(default)]
    pub head_of_program_id: Option<u64>,
    #[serde(default)]
    pub head_of_program_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub learning_outcomes: Option<String>,
    #[serde(default)]
    pub teaching_methods: Vec<String>,
    #[serde(default)]
    pub media: Vec<String>,
    #[serde(default)]
    pub status: Option<RpsStatus>,
    #[serde(default)]
    pub cpmks: Vec<CpmkDto>,
    #[serde(default)]
    pub weekly_plans: Vec<WeeklyPlanDto>,
    #[serde(default)]
    pub assignments: Vec<AssignmentDto>,
    #[serde(default)]
    pub analyses: Vec<AnalysisDto>,
    #[serde(default)]
    pub bibliography: Vec<BibliographyDto>,
    #[serde(default)]
    pub grading_scale: Vec<GradingRowDto>,
}

#[derive(Debug, Deserialize)]
pub struct CpmkDto {
    pub id: u64,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cpl_ids: Vec<u64>,
    #[serde(default)]
    pub order: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SubCpmkDto {
    pub id: u64,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct WeeklyPlanDto {
    #[serde(default)]
    pub id: Option<u64>,
    pub week: u32,
    #[serde(default)]
    pub sub_cpmk_id: Option<u64>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub sub_topics: Vec<String>,
    #[serde(default)]
    pub teaching_method: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub assessment_technique: Option<String>,
    #[serde(default)]
    pub assessment_criteria: Option<String>,
    #[serde(default)]
    pub weight_percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct AssignmentDto {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub sequence: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sub_cpmk_id: Option<u64>,
    #[serde(default)]
    pub success_indicator: Option<String>,
    #[serde(default)]
    pub deadline_week: Option<u32>,
    #[serde(default)]
    pub mode: Option<AssignmentMode>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub deliverable: Option<String>,
    #[serde(default)]
    pub grading_criteria: Option<String>,
    #[serde(default)]
    pub grading_technique: Option<String>,
    #[serde(default)]
    pub weight_percent: Option<f64>,
    #[serde(default)]
    pub references: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisDto {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub week_start: Option<u32>,
    #[serde(default)]
    pub week_end: Option<u32>,
    #[serde(default)]
    pub cpl_id: Option<u64>,
    #[serde(default)]
    pub cpmk_ids: Vec<u64>,
    #[serde(default)]
    pub sub_cpmk_ids: Vec<u64>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub assessment_type: Option<String>,
    #[serde(default)]
    pub weight_percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct BibliographyDto {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub kind: Option<BibliographyKind>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub pages: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub order: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GradingRowDto {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub letter: Option<String>,
    #[serde(default)]
    pub grade_point: Option<f64>,
    #[serde(default)]
    pub passing: Option<bool>,
}
