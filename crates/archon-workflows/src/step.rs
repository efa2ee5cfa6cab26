//! ABOUTME: `WorkflowStep` and the step-kind/status enums that drive dependency resolution
//! ABOUTME: A step's `kind` is a category label; a project's step list may repeat a kind

use serde::{Deserialize, Serialize};

/// Default retry budget for a single step (spec §3: "attempts ≤ max_retries,
/// default 2"). A step gets `DEFAULT_MAX_RETRIES + 1` total attempts before
/// the workflow gives up on it.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Category label used for dependency resolution between steps in a
/// project. The full kind set also defines the `simple` template: one
/// instance of each kind, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    ParseDocs,
    IndexRag,
    AnalyzeReqs,
    AnalyzeSite,
    GenerateLayout,
    Validate,
    Optimize,
    PrepareRevit,
    FinalReview,
}

impl StepKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ParseDocs => "parse_docs",
            Self::IndexRag => "index_rag",
            Self::AnalyzeReqs => "analyze_reqs",
            Self::AnalyzeSite => "analyze_site",
            Self::GenerateLayout => "generate_layout",
            Self::Validate => "validate",
            Self::Optimize => "optimize",
            Self::PrepareRevit => "prepare_revit",
            Self::FinalReview => "final_review",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Skipped,
}

/// A single step in a project's workflow. `id` is unique within the
/// project; `kind` is the category other steps' `deps` reference and may
/// repeat across steps (e.g. one `generate_layout` per floor).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub step_id: String,
    pub index: usize,
    pub kind: StepKind,
    pub deps: Vec<StepKind>,
    pub status: StepStatus,
    pub attempts: u32,
    pub max_retries: u32,
    pub estimated_minutes: u32,
    pub actual_minutes: Option<u32>,
    pub output: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl WorkflowStep {
    #[must_use]
    pub fn new(step_id: impl Into<String>, index: usize, kind: StepKind, deps: Vec<StepKind>, estimated_minutes: u32) -> Self {
        Self {
            step_id: step_id.into(),
            index,
            kind,
            deps,
            status: StepStatus::Pending,
            attempts: 0,
            max_retries: DEFAULT_MAX_RETRIES,
            estimated_minutes,
            actual_minutes: None,
            output: None,
            error: None,
        }
    }

    /// Reset this step back to `Pending`, clearing timing and error state,
    /// as `RetryStep` (spec §4.11) does before resuming the workflow.
    pub fn reset_for_retry(&mut self) {
        self.status = StepStatus::Pending;
        self.attempts = 0;
        self.actual_minutes = None;
        self.error = None;
        self.output = None;
    }
}
