//! ABOUTME: `StepExecutor`: runs a single workflow step's actual work
//! ABOUTME: AI-bearing steps invoke the orchestration coordinator; others call RAG/parser directly

use crate::parser::DocumentParser;
use crate::project::Project;
use crate::step::{StepKind, WorkflowStep};
use archon_core::error::{OrchestratorError, Result};
use archon_core::types::command::{AICommand, Complexity, Locale, TaskType};
use archon_core::types::tenant::SubscriptionTier;
use archon_core::StateScope;
use archon_orchestrator::Coordinator;
use archon_rag::RagRetriever;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Runs the work a single [`WorkflowStep`] represents and returns the
/// output to store in `artifact_bag`. Implementations may call out to the
/// orchestration core, a specialized service, or nothing at all.
#[async_trait]
pub trait StepExecutor: Send + Sync {
    async fn execute(&self, project: &Project, step: &WorkflowStep, tier: SubscriptionTier) -> Result<Value>;
}

/// Production executor: AI-bearing step kinds (`analyze_reqs`,
/// `analyze_site`, `generate_layout`, `validate`, `optimize`) invoke the
/// same [`Coordinator::process_command`] every direct `AICommand` goes
/// through; `parse_docs`/`index_rag` call the document parser and RAG
/// retriever directly; `prepare_revit`/`final_review` are deterministic
/// aggregation steps over prior outputs (spec §4.11).
pub struct DefaultStepExecutor {
    coordinator: Arc<Coordinator>,
    rag: Arc<RagRetriever>,
    parser: Arc<dyn DocumentParser>,
}

impl DefaultStepExecutor {
    #[must_use]
    pub fn new(coordinator: Arc<Coordinator>, rag: Arc<RagRetriever>, parser: Arc<dyn DocumentParser>) -> Self {
        Self { coordinator, rag, parser }
    }

    fn document_id_for(project: &Project, step: &WorkflowStep) -> String {
        let position = project.steps[..=step.index].iter().filter(|s| s.kind == StepKind::ParseDocs).count() - 1;
        project
            .request_fields
            .get("document_ids")
            .and_then(Value::as_array)
            .and_then(|docs| docs.get(position))
            .and_then(Value::as_str)
            .map_or_else(|| format!("{}_doc_{position}", project.project_id), ToString::to_string)
    }

    fn ai_command(project: &Project, step: &WorkflowStep, task_type: TaskType, prompt_text: String, context: HashMap<String, Value>) -> AICommand {
        let locale = project.request_fields.get("locale").and_then(Value::as_str).map_or_else(Locale::default, Locale::new);
        AICommand {
            correlation_id: step.step_id.clone(),
            tenant_id: project.tenant_id.clone(),
            task_type,
            locale,
            prompt_text,
            context,
            complexity: Complexity::Medium,
            file_format: None,
            language: None,
        }
    }

    async fn run_analyze(&self, project: &Project, step: &WorkflowStep, tier: SubscriptionTier, label: &str) -> Result<Value> {
        let mut context = project.request_fields.clone();
        context.insert("analysis_kind".to_string(), json!(label));
        let cmd = Self::ai_command(project, step, TaskType::Analyze, format!("Analyze {label} for project {}", project.project_id), context);
        let result = self.coordinator.process_command(&cmd, tier).await?;
        serde_json::to_value(&result).map_err(|err| OrchestratorError::Internal { message: err.to_string() })
    }

    async fn run_generate_layout(&self, project: &Project, step: &WorkflowStep, tier: SubscriptionTier) -> Result<Value> {
        let mut context = project.request_fields.clone();
        if let Some(reqs) = project.latest_output_for_kind(StepKind::AnalyzeReqs, step.index) {
            context.insert("analyze_reqs".to_string(), reqs.clone());
        }
        if let Some(site) = project.latest_output_for_kind(StepKind::AnalyzeSite, step.index) {
            context.insert("analyze_site".to_string(), site.clone());
        }
        let cmd = Self::ai_command(project, step, TaskType::Layout, format!("Generate layout for project {}", project.project_id), context);
        let result = self.coordinator.process_command(&cmd, tier).await?;
        serde_json::to_value(&result).map_err(|err| OrchestratorError::Internal { message: err.to_string() })
    }

    async fn run_validate(&self, project: &Project, step: &WorkflowStep, tier: SubscriptionTier) -> Result<Value> {
        let mut context = project.request_fields.clone();
        if let Some(layout) = project.latest_output_for_kind(StepKind::GenerateLayout, step.index) {
            context.insert("generate_layout".to_string(), layout.clone());
        }
        let cmd = Self::ai_command(project, step, TaskType::Validate, format!("Validate layout for project {}", project.project_id), context);
        let result = self.coordinator.process_command(&cmd, tier).await?;
        serde_json::to_value(&result).map_err(|err| OrchestratorError::Internal { message: err.to_string() })
    }

    async fn run_optimize(&self, project: &Project, step: &WorkflowStep, tier: SubscriptionTier) -> Result<Value> {
        let mut context = project.request_fields.clone();
        if let Some(layout) = project.latest_output_for_kind(StepKind::GenerateLayout, step.index) {
            context.insert("generate_layout".to_string(), layout.clone());
        }
        if let Some(validation) = project.latest_output_for_kind(StepKind::Validate, step.index) {
            context.insert("validate".to_string(), validation.clone());
        }
        let cmd = Self::ai_command(project, step, TaskType::Layout, format!("Optimize layout for project {}", project.project_id), context);
        let result = self.coordinator.process_command(&cmd, tier).await?;
        let mut value = serde_json::to_value(&result).map_err(|err| OrchestratorError::Internal { message: err.to_string() })?;
        if let Value::Object(ref mut map) = value {
            map.insert("layout_id".to_string(), json!(format!("{}_optimized", step.step_id)));
        }
        Ok(value)
    }
}

#[async_trait]
impl StepExecutor for DefaultStepExecutor {
    async fn execute(&self, project: &Project, step: &WorkflowStep, tier: SubscriptionTier) -> Result<Value> {
        match step.kind {
            StepKind::ParseDocs => {
                let doc_id = Self::document_id_for(project, step);
                let parsed = self.parser.parse(&doc_id).await?;
                serde_json::to_value(&parsed).map_err(|err| OrchestratorError::Internal { message: err.to_string() })
            }
            StepKind::IndexRag => {
                let scope = StateScope::project(project.project_id.clone());
                let mut indexed = Vec::new();
                for prior in project.steps[..step.index].iter().filter(|s| s.kind == StepKind::ParseDocs) {
                    let Some(output) = project.artifact_bag.get(&prior.step_id) else { continue };
                    let doc_id = output.get("doc_id").and_then(Value::as_str).unwrap_or_default();
                    let text = output.get("text").and_then(Value::as_str).unwrap_or_default();
                    let language = output.get("language").and_then(Value::as_str).unwrap_or("en");
                    let count = self.rag.index_document(doc_id, text, language, scope.clone()).await?;
                    indexed.push(json!({"doc_id": doc_id, "chunks_indexed": count}));
                }
                Ok(json!({ "indexed_documents": indexed }))
            }
            StepKind::AnalyzeReqs => self.run_analyze(project, step, tier, "requirements").await,
            StepKind::AnalyzeSite => self.run_analyze(project, step, tier, "site").await,
            StepKind::GenerateLayout => self.run_generate_layout(project, step, tier).await,
            StepKind::Validate => self.run_validate(project, step, tier).await,
            StepKind::Optimize => self.run_optimize(project, step, tier).await,
            StepKind::PrepareRevit => {
                let layout_id = project
                    .latest_output_for_kind(StepKind::Optimize, step.index)
                    .and_then(|v| v.get("layout_id").cloned())
                    .or_else(|| project.latest_output_for_kind(StepKind::GenerateLayout, step.index).map(|_| json!(format!("{}_generated", project.project_id))));
                Ok(json!({ "export_ready": true, "layout_id": layout_id }))
            }
            StepKind::FinalReview => {
                let requires_review = project.steps[..step.index].iter().any(|s| project.artifact_bag.get(&s.step_id).and_then(|v| v.get("requires_human_review")).and_then(Value::as_bool).unwrap_or(false));
                Ok(json!({ "reviewed": true, "requires_human_review": requires_review }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::PassthroughParser;
    use crate::project::ProjectComplexity;
    use crate::templates::build_steps;
    use archon_cache::{InMemoryL2, ResultCache};
    use archon_core::traits::clock::SystemClock;
    use archon_orchestrator::DependencyContainer;
    use archon_prompt::{PromptAssembler, TemplateStore};
    use archon_providers::{abstraction::RawResponse, catalog::ModelId, Provider, ProviderCallError, ProviderConfig, ProviderDispatcher};
    use archon_rag::{ChunkingConfig, LocalEmbedder, RetrieverConfig};
    use archon_tenancy::UsageAccountant;
    use archon_util::ProviderRateLimiter;
    use chrono::Utc;
    use std::collections::HashMap as StdHashMap;

    struct ScriptedProvider;

    #[async_trait]
    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "vertex_ai"
        }

        async fn call(&self, model: ModelId, _prompt: &str, _config: &ProviderConfig) -> std::result::Result<RawResponse, ProviderCallError> {
            Ok(RawResponse {
                text: r#"{"walls": [], "doors": [], "windows": [], "rooms": [{"name": "bedroom", "area": 12.0}], "confidence": 0.9}"#.to_string(),
                model_id: model.key(),
                latency_ms: 1,
                tokens_in: Some(1),
                tokens_out: Some(1),
                finish_reason: Some("stop".to_string()),
            })
        }
    }

    fn executor() -> DefaultStepExecutor {
        let templates = TemplateStore::from_entries(vec![("layout", "en", archon_prompt::templates::ANY_PROVIDER, "Design: {prompt_text}\n{rag_passages}\n{context}".to_string()), ("analyze", "en", archon_prompt::templates::ANY_PROVIDER, "Analyze: {prompt_text}\n{context}".to_string())]);
        let mut providers: StdHashMap<&'static str, Arc<dyn Provider>> = StdHashMap::new();
        providers.insert("vertex_ai", Arc::new(ScriptedProvider));
        let mut configs = StdHashMap::new();
        configs.insert("vertex_ai", ProviderConfig { base_url: "https://example.test".to_string(), auth_header_env: "VERTEX_AI_TOKEN".to_string(), timeout_ms: 2_000 });

        let rag = Arc::new(RagRetriever::new(ChunkingConfig::default(), Arc::new(LocalEmbedder::default()), RetrieverConfig::default()));
        let deps = DependencyContainer::new(
            rag.clone(),
            Arc::new(PromptAssembler::new(templates)),
            Arc::new(ProviderDispatcher::new(providers, configs)),
            Arc::new(ResultCache::new(10, Arc::new(InMemoryL2::default()))),
            Arc::new(UsageAccountant::new()),
            Arc::new(ProviderRateLimiter::new()),
            Arc::new(SystemClock),
        );
        DefaultStepExecutor::new(Arc::new(Coordinator::new(deps)), rag, Arc::new(PassthroughParser))
    }

    fn project() -> Project {
        let steps = build_steps("p1", ProjectComplexity::Simple, &StdHashMap::new());
        Project::new("p1", archon_core::types::tenant::TenantId::new("acme"), StdHashMap::new(), ProjectComplexity::Simple, steps, Utc::now())
    }

    #[tokio::test]
    async fn generate_layout_step_invokes_the_coordinator() {
        let executor = executor();
        let project = project();
        let step = project.steps.iter().find(|s| s.kind == StepKind::GenerateLayout).unwrap();
        let output = executor.execute(&project, step, SubscriptionTier::Professional).await.unwrap();
        assert_eq!(output.get("status").and_then(Value::as_str), Some("succeeded"));
    }

    #[tokio::test]
    async fn parse_docs_step_calls_the_document_parser() {
        let executor = executor();
        let project = project();
        let step = project.steps.iter().find(|s| s.kind == StepKind::ParseDocs).unwrap();
        let output = executor.execute(&project, step, SubscriptionTier::Professional).await.unwrap();
        assert!(output.get("doc_id").is_some());
    }
}
