//! ABOUTME: Workflow Engine (C11): project creation plus dependency-gated step execution
//! ABOUTME: Steps run strictly in declared index order; no intra-workflow parallelism is required

use crate::executor::StepExecutor;
use crate::project::{Project, ProjectComplexity, ProjectStatus};
use crate::step::StepStatus;
use crate::templates::{build_steps, classify_complexity};
use archon_core::error::{OrchestratorError, Result};
use archon_core::traits::clock::Clock;
use archon_core::types::tenant::{SubscriptionTier, TenantId};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Drives [`Project`] execution: builds the step template for a
/// newly-created project and runs it to completion (or to the first
/// terminal step failure), honoring dependency gating and per-step retry.
pub struct WorkflowEngine {
    executor: Arc<dyn StepExecutor>,
    clock: Arc<dyn Clock>,
}

impl WorkflowEngine {
    #[must_use]
    pub fn new(executor: Arc<dyn StepExecutor>, clock: Arc<dyn Clock>) -> Self {
        Self { executor, clock }
    }

    /// Classify `request_fields` and build a fresh [`Project`] in the
    /// `created` state. Does not run any step; call [`Self::execute`] next.
    #[must_use]
    pub fn create_project(&self, project_id: impl Into<String>, tenant_id: TenantId, request_fields: HashMap<String, Value>) -> Project {
        let project_id = project_id.into();
        let complexity = classify_complexity(&request_fields);
        let steps = build_steps(&project_id, complexity, &request_fields);
        Project::new(project_id, tenant_id, request_fields, complexity, steps, self.clock.now())
    }

    /// Run every `pending` step from the start of `project.steps`, gated on
    /// dependencies, with per-step retry up to `max_retries`. Stops (and
    /// leaves remaining steps untouched) the moment a step exhausts its
    /// retries; a step whose dependencies never resolve is marked
    /// `skipped` and execution continues past it.
    #[instrument(skip(self, project), fields(project_id = %project.project_id))]
    pub async fn execute(&self, project: &mut Project, tier: SubscriptionTier) -> Result<()> {
        project.status = ProjectStatus::Running;
        self.run_from(project, 0, tier).await
    }

    /// Reset `step_id` to `pending` and resume execution from its index
    /// onward (spec §4.11's `RetryStep`).
    #[instrument(skip(self, project), fields(project_id = %project.project_id, step_id = %step_id))]
    pub async fn retry_step(&self, project: &mut Project, step_id: &str, tier: SubscriptionTier) -> Result<()> {
        let index = project.step(step_id).ok_or_else(|| OrchestratorError::NotFound { message: format!("no step {step_id} in project {}", project.project_id) })?.index;
        project.step_mut(step_id).expect("index looked up above").reset_for_retry();
        project.status = ProjectStatus::Running;
        self.run_from(project, index, tier).await
    }

    async fn run_from(&self, project: &mut Project, start_index: usize, tier: SubscriptionTier) -> Result<()> {
        let mut index = start_index;
        while index < project.steps.len() {
            if project.steps[index].status != StepStatus::Pending {
                index += 1;
                continue;
            }

            if !project.deps_satisfied(&project.steps[index]) {
                let step_id = project.steps[index].step_id.clone();
                warn!(step_id, kind = ?project.steps[index].kind, "dependencies unmet, skipping step");
                project.steps[index].status = StepStatus::Skipped;
                index += 1;
                continue;
            }

            let outcome = self.run_step_with_retry(project, index, tier).await;
            project.updated_at = self.clock.now();
            if outcome.is_err() {
                project.recompute_status();
                return Ok(());
            }
            index += 1;
        }

        project.recompute_status();
        Ok(())
    }

    async fn run_step_with_retry(&self, project: &mut Project, index: usize, tier: SubscriptionTier) -> Result<()> {
        let max_retries = project.steps[index].max_retries;
        let step_id = project.steps[index].step_id.clone();
        loop {
            project.steps[index].status = StepStatus::Running;
            project.steps[index].attempts += 1;
            let started = self.clock.now();
            let step_snapshot = project.steps[index].clone();

            let result = self.executor.execute(project, &step_snapshot, tier).await;
            let elapsed_minutes = (self.clock.now() - started).num_seconds().max(0) as u32 / 60;

            match result {
                Ok(output) => {
                    project.steps[index].status = StepStatus::Completed;
                    project.steps[index].actual_minutes = Some(elapsed_minutes);
                    project.record_output(&step_id, output);
                    info!(step_id, attempts = project.steps[index].attempts, "step completed");
                    return Ok(());
                }
                Err(err) => {
                    if project.steps[index].attempts > max_retries {
                        project.steps[index].status = StepStatus::Failed;
                        project.steps[index].actual_minutes = Some(elapsed_minutes);
                        project.steps[index].error = Some(err.to_string());
                        warn!(step_id, attempts = project.steps[index].attempts, error = %err, "step failed, stopping workflow");
                        return Err(err);
                    }
                    warn!(step_id, attempt = project.steps[index].attempts, error = %err, "step attempt failed, retrying");
                    project.steps[index].status = StepStatus::Pending;
                }
            }
        }
    }

    #[must_use]
    pub fn progress(project: &Project) -> (f64, u32) {
        (project.progress(), project.eta_minutes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectComplexity;
    use crate::step::{StepKind, WorkflowStep};
    use archon_core::traits::clock::SystemClock;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingExecutor {
        optimize_attempts: AtomicU32,
        fail_first_n: u32,
    }

    #[async_trait]
    impl StepExecutor for CountingExecutor {
        async fn execute(&self, _project: &Project, step: &WorkflowStep, _tier: SubscriptionTier) -> Result<Value> {
            if step.kind == StepKind::Optimize {
                let n = self.optimize_attempts.fetch_add(1, Ordering::SeqCst) + 1;
                if n <= self.fail_first_n {
                    return Err(OrchestratorError::Internal { message: "transient".to_string() });
                }
            }
            Ok(json!({ "kind": step.kind.as_str(), "requires_human_review": false }))
        }
    }

    struct AlwaysFailExecutor;

    #[async_trait]
    impl StepExecutor for AlwaysFailExecutor {
        async fn execute(&self, _project: &Project, _step: &WorkflowStep, _tier: SubscriptionTier) -> Result<Value> {
            Err(OrchestratorError::Internal { message: "boom".to_string() })
        }
    }

    struct SucceedExecutor;

    #[async_trait]
    impl StepExecutor for SucceedExecutor {
        async fn execute(&self, _project: &Project, step: &WorkflowStep, _tier: SubscriptionTier) -> Result<Value> {
            Ok(json!({ "kind": step.kind.as_str() }))
        }
    }

    fn project_with(steps: Vec<WorkflowStep>) -> Project {
        Project::new("p1", TenantId::new("acme"), HashMap::new(), ProjectComplexity::Simple, steps, chrono::Utc::now())
    }

    #[tokio::test]
    async fn all_steps_succeed_marks_project_completed() {
        let engine = WorkflowEngine::new(Arc::new(SucceedExecutor), Arc::new(SystemClock));
        let mut project = engine.create_project("p1", TenantId::new("acme"), HashMap::new());
        engine.execute(&mut project, SubscriptionTier::Professional).await.unwrap();
        assert_eq!(project.status, ProjectStatus::Completed);
        assert!(project.steps.iter().all(|s| s.status == StepStatus::Completed));
    }

    #[tokio::test]
    async fn a_step_failing_past_retries_stops_the_workflow_and_leaves_later_steps_pending() {
        let engine = WorkflowEngine::new(Arc::new(AlwaysFailExecutor), Arc::new(SystemClock));
        let mut project = engine.create_project("p1", TenantId::new("acme"), HashMap::new());
        engine.execute(&mut project, SubscriptionTier::Professional).await.unwrap();
        assert_eq!(project.status, ProjectStatus::Failed);
        assert_eq!(project.steps[0].status, StepStatus::Failed);
        assert_eq!(project.steps[0].attempts, 3); // 1 initial + 2 retries
        assert_eq!(project.steps[1].status, StepStatus::Pending);
    }

    #[tokio::test]
    async fn step_retried_twice_then_succeeds_matches_scenario_s6() {
        let executor = Arc::new(CountingExecutor { optimize_attempts: AtomicU32::new(0), fail_first_n: 2 });
        let engine = WorkflowEngine::new(executor, Arc::new(SystemClock));
        let mut project = engine.create_project("p1", TenantId::new("acme"), HashMap::new());
        engine.execute(&mut project, SubscriptionTier::Professional).await.unwrap();

        assert_eq!(project.status, ProjectStatus::Completed);
        let optimize_step = project.steps.iter().find(|s| s.kind == StepKind::Optimize).unwrap();
        assert_eq!(optimize_step.attempts, 3);
        let prepare_step = project.steps.iter().find(|s| s.kind == StepKind::PrepareRevit).unwrap();
        let prepare_output = project.artifact_bag.get(&prepare_step.step_id).unwrap();
        assert_eq!(prepare_output.get("kind").and_then(Value::as_str), Some("prepare_revit"));
    }

    #[tokio::test]
    async fn retry_step_resumes_from_the_reset_step() {
        let engine = WorkflowEngine::new(Arc::new(AlwaysFailExecutor), Arc::new(SystemClock));
        let mut project = engine.create_project("p1", TenantId::new("acme"), HashMap::new());
        engine.execute(&mut project, SubscriptionTier::Professional).await.unwrap();
        assert_eq!(project.status, ProjectStatus::Failed);

        let failed_step_id = project.steps[0].step_id.clone();
        let succeeding_engine = WorkflowEngine::new(Arc::new(SucceedExecutor), Arc::new(SystemClock));
        succeeding_engine.retry_step(&mut project, &failed_step_id, SubscriptionTier::Professional).await.unwrap();
        assert_eq!(project.status, ProjectStatus::Completed);
    }

    #[test]
    fn progress_and_eta_reflect_step_state() {
        let mut steps = vec![WorkflowStep::new("s0", 0, StepKind::ParseDocs, vec![], 2), WorkflowStep::new("s1", 1, StepKind::IndexRag, vec![StepKind::ParseDocs], 3)];
        steps[0].status = StepStatus::Completed;
        let project = project_with(steps);
        let (progress, eta) = WorkflowEngine::progress(&project);
        assert!((progress - 0.5).abs() < f64::EPSILON);
        assert_eq!(eta, 3);
    }
}
