//! Typed document container for the in-progress RPS draft.
//!
//! Every sub-entity carries a generated `local_id` so correlation with server
//! identities survives reordering and removal; the server `id` stays `None`
//! until the owning step is submitted and the create response is adopted.
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::DRAFT_SCHEMA_VERSION;

/// One tab of the authoring wizard, in fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Info,
    Cpmk,
    SubCpmk,
    WeeklyPlan,
    Assignments,
    Analysis,
    Bibliography,
    GradingScale,
}

/// The fixed wizard topology; drives tab order, dispatch, and advancement.
pub const STEP_ORDER: [Step; 8] = [
    Step::Info,
    Step::Cpmk,
    Step::SubCpmk,
    Step::WeeklyPlan,
    Step::Assignments,
    Step::Analysis,
    Step::Bibliography,
    Step::GradingScale,
];

impl Step {
    /// Return the stable string identifier used in JSON artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Info => "info",
            Step::Cpmk => "cpmk",
            Step::SubCpmk => "sub_cpmk",
            Step::WeeklyPlan => "weekly_plan",
            Step::Assignments => "assignments",
            Step::Analysis => "analysis",
            Step::Bibliography => "bibliography",
            Step::GradingScale => "grading_scale",
        }
    }

    /// Zero-based position in the fixed step order.
    pub fn position(&self) -> usize {
        STEP_ORDER
            .iter()
            .position(|step| step == self)
            .unwrap_or(0)
    }

    /// The step after this one, if any.
    pub fn next(&self) -> Option<Step> {
        STEP_ORDER.get(self.position() + 1).copied()
    }

    /// The step before this one, if any.
    pub fn previous(&self) -> Option<Step> {
        self.position().checked_sub(1).map(|idx| STEP_ORDER[idx])
    }

    /// The terminal step from which finalize is reachable.
    pub fn last() -> Step {
        STEP_ORDER[STEP_ORDER.len() - 1]
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Step {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        STEP_ORDER
            .iter()
            .find(|step| step.as_str() == normalized)
            .copied()
            .ok_or_else(|| {
                let known: Vec<&str> = STEP_ORDER.iter().map(Step::as_str).collect();
                format!("unknown step {raw:?} (expected one of: {})", known.join(", "))
            })
    }
}

/// Semester parity for the course offering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Semester {
    #[default]
    Odd,
    Even,
}

/// Review lifecycle of the root RPS record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RpsStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    Rejected,
    Revision,
    Published,
}

/// Kind of a bibliography entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BibliographyKind {
    #[default]
    Book,
    Journal,
    Article,
    Website,
    Module,
}

/// Whether an assignment is done individually or in groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentMode {
    Individual,
    Group,
}

/// Root RPS fields edited in the Info step.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RpsInfo {
    #[serde(default)]
    pub course_id: Option<u64>,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub academic_year: String,
    #[serde(default)]
    pub semester: Semester,
    #[serde(default)]
    pub author_id: Option<u64>,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub coordinator_id: Option<u64>,
    #[serde(default)]
    pub coordinator_name: String,
    #[serde(default)]
    pub head_of_program_id: Option<u64>,
    #[serde(default)]
    pub head_of_program_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub learning_outcomes: String,
    #[serde(default)]
    pub teaching_methods: Vec<String>,
    #[serde(default)]
    pub media: Vec<String>,
    #[serde(default)]
    pub status: RpsStatus,
}

/// Course learning outcome, mapped to one or more program outcomes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Cpmk {
    #[serde(default = "Uuid::new_v4")]
    pub local_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cpl_ids: Vec<u64>,
    #[serde(default)]
    pub order: u32,
}

impl Cpmk {
    /// Minimum content required before the entry is submitted at all.
    pub fn has_content(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

/// Weekly-achievable breakdown of one CPMK.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubCpmk {
    #[serde(default = "Uuid::new_v4")]
    pub local_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Owning CPMK by local identity; the server id is resolved at submit time.
    pub cpmk_local_id: Uuid,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: u32,
}

impl SubCpmk {
    pub fn has_content(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

/// Planned topic, method, and assessment for one teaching week.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeeklyPlan {
    #[serde(default = "Uuid::new_v4")]
    pub local_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub week: u32,
    #[serde(default)]
    pub sub_cpmk_id: Option<u64>,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub sub_topics: Vec<String>,
    #[serde(default)]
    pub teaching_method: String,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub assessment_technique: String,
    #[serde(default)]
    pub assessment_criteria: String,
    #[serde(default)]
    pub weight_percent: f64,
}

impl WeeklyPlan {
    pub fn has_content(&self) -> bool {
        !self.topic.trim().is_empty()
    }
}

/// Structured assignment plan linked to a sub-outcome.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Assignment {
    #[serde(default = "Uuid::new_v4")]
    pub local_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub sequence: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sub_cpmk_id: Option<u64>,
    #[serde(default)]
    pub success_indicator: String,
    /// Deadline as a teaching week number (1..=16).
    #[serde(default)]
    pub deadline_week: Option<u32>,
    #[serde(default)]
    pub mode: Option<AssignmentMode>,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub deliverable: String,
    #[serde(default)]
    pub grading_criteria: String,
    #[serde(default)]
    pub grading_technique: String,
    #[serde(default)]
    pub weight_percent: f64,
    #[serde(default)]
    pub references: Vec<String>,
}

impl Assignment {
    pub fn has_content(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// Mapping asserting how a span of weeks contributes to one program outcome.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AchievementAnalysis {
    #[serde(default = "Uuid::new_v4")]
    pub local_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub week_start: u32,
    #[serde(default)]
    pub week_end: Option<u32>,
    #[serde(default)]
    pub cpl_id: Option<u64>,
    #[serde(default)]
    pub cpmk_ids: Vec<u64>,
    #[serde(default)]
    pub sub_cpmk_ids: Vec<u64>,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub assessment_type: String,
    #[serde(default)]
    pub weight_percent: f64,
}

impl AchievementAnalysis {
    pub fn has_content(&self) -> bool {
        !self.topic.trim().is_empty()
    }
}

/// One reference in the course bibliography.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BibliographyEntry {
    #[serde(default = "Uuid::new_v4")]
    pub local_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub kind: BibliographyKind,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub pages: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub order: u32,
}

impl BibliographyEntry {
    pub fn has_content(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// One row of the score-to-letter grading scale.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GradingRow {
    #[serde(default = "Uuid::new_v4")]
    pub local_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub min_score: f64,
    #[serde(default)]
    pub max_score: f64,
    #[serde(default)]
    pub letter: String,
    #[serde(default)]
    pub grade_point: f64,
    #[serde(default)]
    pub passing: bool,
}

impl GradingRow {
    pub fn has_content(&self) -> bool {
        !self.letter.trim().is_empty()
    }
}

/// Eligible course offered for RPS authoring.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CourseRef {
    pub id: u64,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
}

/// Published program-level learning outcome.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CplOutcome {
    pub id: u64,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
}

/// Reference data loaded alongside the document for editing.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub courses: Vec<CourseRef>,
    #[serde(default)]
    pub outcomes: Vec<CplOutcome>,
}

/// Server ids queued for deletion, per collection.
///
/// Queued ids survive draft save/load cycles so a removal does not require an
/// immediate network round-trip; the owning step's push drains them first.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PendingDeletes {
    #[serde(default)]
    pub cpmk: Vec<u64>,
    #[serde(default)]
    pub sub_cpmk: Vec<u64>,
    #[serde(default)]
    pub weekly_plan: Vec<u64>,
    #[serde(default)]
    pub assignments: Vec<u64>,
    #[serde(default)]
    pub analysis: Vec<u64>,
    #[serde(default)]
    pub bibliography: Vec<u64>,
    #[serde(default)]
    pub grading_scale: Vec<u64>,
}

impl PendingDeletes {
    /// The deletion queue owned by a step, if that step persists a collection.
    pub fn for_step(&mut self, step: Step) -> Option<&mut Vec<u64>> {
        match step {
            Step::Info => None,
            Step::Cpmk => Some(&mut self.cpmk),
            Step::SubCpmk => Some(&mut self.sub_cpmk),
            Step::WeeklyPlan => Some(&mut self.weekly_plan),
            Step::Assignments => Some(&mut self.assignments),
            Step::Analysis => Some(&mut self.analysis),
            Step::Bibliography => Some(&mut self.bibliography),
            Step::GradingScale => Some(&mut self.grading_scale),
        }
    }
}

/// Wizard bookkeeping carried between commands.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WizardState {
    pub active_step: Step,
    #[serde(default)]
    pub completed_steps: BTreeSet<Step>,
    /// Submission errors recorded per step in this session, for finalize.
    #[serde(default)]
    pub step_errors: BTreeMap<Step, Vec<String>>,
    /// Count of optional fields that received a documented default on load.
    #[serde(default)]
    pub defaulted_fields: u32,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            active_step: Step::Info,
            completed_steps: BTreeSet::new(),
            step_errors: BTreeMap::new(),
            defaulted_fields: 0,
        }
    }
}

/// The entire in-progress document plus wizard bookkeeping.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RpsDraft {
    pub schema_version: u32,
    pub rps_id: u64,
    pub info: RpsInfo,
    #[serde(default)]
    pub cpmks: Vec<Cpmk>,
    #[serde(default)]
    pub sub_cpmks: Vec<SubCpmk>,
    #[serde(default)]
    pub weekly_plans: Vec<WeeklyPlan>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub analyses: Vec<AchievementAnalysis>,
    #[serde(default)]
    pub bibliography: Vec<BibliographyEntry>,
    #[serde(default)]
    pub grading_scale: Vec<GradingRow>,
    #[serde(default)]
    pub pending_deletes: PendingDeletes,
    #[serde(default)]
    pub references: ReferenceData,
    #[serde(default)]
    pub wizard: WizardState,
}

impl RpsDraft {
    /// Empty draft for a known root record.
    pub fn new(rps_id: u64) -> Self {
        Self {
            schema_version: DRAFT_SCHEMA_VERSION,
            rps_id,
            info: RpsInfo::default(),
            cpmks: Vec::new(),
            sub_cpmks: Vec::new(),
            weekly_plans: Vec::new(),
            assignments: Vec::new(),
            analyses: Vec::new(),
            bibliography: Vec::new(),
            grading_scale: Vec::new(),
            pending_deletes: PendingDeletes::default(),
            references: ReferenceData::default(),
            wizard: WizardState::default(),
        }
    }

    /// Look up a CPMK by its stable local identity.
    pub fn cpmk_by_local_id(&self, local_id: Uuid) -> Option<&Cpmk> {
        self.cpmks.iter().find(|cpmk| cpmk.local_id == local_id)
    }

    /// Next free number in the `CPMK-NN` sequence.
    pub fn next_cpmk_number(&self) -> u32 {
        next_code_number(self.cpmks.iter().map(|cpmk| cpmk.code.as_str()), "CPMK")
    }

    /// Next free number in the `SUB-CPMK-NN` sequence.
    pub fn next_sub_cpmk_number(&self) -> u32 {
        next_code_number(
            self.sub_cpmks.iter().map(|sub| sub.code.as_str()),
            "SUB-CPMK",
        )
    }
}

fn next_code_number<'a>(codes: impl Iterator<Item = &'a str>, prefix: &str) -> u32 {
    let pattern = Regex::new(&format!(r"^{}-(\d+)$", regex::escape(prefix)))
        .expect("static code pattern compiles");
    let highest = codes
        .filter_map(|code| pattern.captures(code.trim()))
        .filter_map(|captures| captures[1].parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    highest + 1
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
