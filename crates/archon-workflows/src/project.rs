//! ABOUTME: `Project`, the workflow root, and its status state machine
//! ABOUTME: Owns `WorkflowStep` lifetimes; step outputs are copied into `artifact_bag`

use crate::step::{StepKind, StepStatus, WorkflowStep};
use archon_core::types::tenant::TenantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Template bucket a project is classified into (spec §4.11). Distinct
/// from `archon_core::Complexity`, which classifies a single `AICommand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectComplexity {
    Simple,
    Standard,
    Complex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Created,
    Running,
    Completed,
    PartiallyCompleted,
    Failed,
}

/// Workflow root: a multi-step project driving the orchestration core
/// across a dependency-ordered step list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub project_id: String,
    pub tenant_id: TenantId,
    pub request_fields: HashMap<String, serde_json::Value>,
    pub complexity: ProjectComplexity,
    pub status: ProjectStatus,
    pub steps: Vec<WorkflowStep>,
    pub artifact_bag: HashMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    #[must_use]
    pub fn new(project_id: impl Into<String>, tenant_id: TenantId, request_fields: HashMap<String, serde_json::Value>, complexity: ProjectComplexity, steps: Vec<WorkflowStep>, now: DateTime<Utc>) -> Self {
        Self {
            project_id: project_id.into(),
            tenant_id,
            request_fields,
            complexity,
            status: ProjectStatus::Created,
            steps,
            artifact_bag: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn step(&self, step_id: &str) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.step_id == step_id)
    }

    #[must_use]
    pub fn step_mut(&mut self, step_id: &str) -> Option<&mut WorkflowStep> {
        self.steps.iter_mut().find(|s| s.step_id == step_id)
    }

    /// Whether every prior instance (by index) of `kind` among `self.steps`
    /// that the dependency graph requires has completed. A step with an
    /// empty `deps` list is always satisfiable.
    #[must_use]
    pub(crate) fn deps_satisfied(&self, step: &WorkflowStep) -> bool {
        step.deps.iter().all(|dep_kind| self.steps[..step.index].iter().any(|prior| prior.kind == *dep_kind && prior.status == StepStatus::Completed))
    }

    /// `completed / total` progress fraction.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.steps.is_empty() {
            return 1.0;
        }
        let completed = self.steps.iter().filter(|s| s.status == StepStatus::Completed).count();
        completed as f64 / self.steps.len() as f64
    }

    /// ETA in minutes: the sum of `estimated_minutes` over every step not
    /// yet in a terminal state.
    #[must_use]
    pub fn eta_minutes(&self) -> u32 {
        self.steps.iter().filter(|s| matches!(s.status, StepStatus::Pending | StepStatus::Running)).map(|s| s.estimated_minutes).sum()
    }

    /// Recompute `status` from the current step states (spec §3's
    /// invariant: `status = completed ⇔ ∀ step. status = completed`).
    pub(crate) fn recompute_status(&mut self) {
        let any_failed = self.steps.iter().any(|s| s.status == StepStatus::Failed);
        let any_skipped = self.steps.iter().any(|s| s.status == StepStatus::Skipped);
        let all_completed = self.steps.iter().all(|s| s.status == StepStatus::Completed);
        self.status = if any_failed {
            ProjectStatus::Failed
        } else if all_completed {
            ProjectStatus::Completed
        } else if any_skipped {
            ProjectStatus::PartiallyCompleted
        } else {
            ProjectStatus::Running
        };
    }

    /// The output of the most recent completed step of `kind` with index
    /// strictly less than `before_index` — what a later step reads "by
    /// kind" (spec §4.11) when a kind repeats (e.g. one `generate_layout`
    /// per floor). `artifact_bag` itself is keyed by `step_id` (spec §3's
    /// persisted-state shape); this is the by-kind lookup view over it.
    #[must_use]
    pub fn latest_output_for_kind(&self, kind: StepKind, before_index: usize) -> Option<&serde_json::Value> {
        self.steps[..before_index.min(self.steps.len())]
            .iter()
            .rev()
            .find(|s| s.kind == kind && s.status == StepStatus::Completed)
            .and_then(|s| self.artifact_bag.get(&s.step_id))
    }

    pub(crate) fn record_output(&mut self, step_id: &str, output: serde_json::Value) {
        self.artifact_bag.insert(step_id.to_string(), output);
    }
}
