//! ABOUTME: Orchestration Coordinator (C10): the single `process_command` entry point
//! ABOUTME: Implements the nine-step sequence in spec §4.10, verbatim in order

use crate::container::DependencyContainer;
use crate::request::fallback_request_for;
use crate::shape::shape_success;
use archon_cache::CacheKey;
use archon_core::error::OrchestratorError;
use archon_core::types::command::AICommand;
use archon_core::types::result::{AICommandResult, AICommandStatus};
use archon_core::types::tenant::SubscriptionTier;
use archon_core::{codes_for_region, StateScope};
use archon_fallback::{FallbackGenerator, FallbackReason};
use archon_providers::SelectionContext;
use archon_tenancy::UsageCategory;
use archon_util::ProviderLimits;
use dashmap::DashSet;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Maps the task being requested onto the usage category the accountant
/// meters it under (spec §4.9's category list only breaks out layouts
/// specially; every other task type counts against the general budget).
const fn usage_category_for(task: archon_core::types::command::TaskType) -> UsageCategory {
    match task {
        archon_core::types::command::TaskType::Layout => UsageCategory::LayoutGenerations,
        _ => UsageCategory::AiRequests,
    }
}

/// Single exposed operation of the orchestration service. Holds a
/// [`DependencyContainer`] plus the set of tenants already registered with
/// the rate limiter (registration is not idempotent on the limiter itself,
/// so the coordinator tracks it).
pub struct Coordinator {
    deps: DependencyContainer,
    rate_limited_tenants: DashSet<String>,
}

impl Coordinator {
    #[must_use]
    pub fn new(deps: DependencyContainer) -> Self {
        Self { deps, rate_limited_tenants: DashSet::new() }
    }

    async fn admit(&self, tenant_id: &str, tier: SubscriptionTier) -> Result<(), OrchestratorError> {
        if self.rate_limited_tenants.insert(tenant_id.to_string()) {
            self.deps
                .tenant_rate_limiter
                .add_provider(tenant_id, ProviderLimits::for_tenant_tier(tier))
                .await
                .map_err(|err| OrchestratorError::Internal { message: err.to_string() })?;
        }

        self.deps.tenant_rate_limiter.check_rate_limit(tenant_id).await.map_err(|err| match err {
            archon_util::RateLimitError::Exceeded { retry_after_secs } => OrchestratorError::RateLimited { retry_after_secs },
            archon_util::RateLimitError::UnknownProvider(name) => OrchestratorError::Internal { message: format!("rate limiter has no bucket for {name}") },
        })
    }

    /// Run the full pipeline for `cmd`, admitted under `tenant_id`'s `tier`.
    ///
    /// Steps 1-2 (admission, quota) return an error immediately on failure
    /// per spec §7: these are never retried and never trigger fallback.
    /// Steps 4-7 degrade to the deterministic fallback generator (step 9)
    /// on any provider or output-validation failure rather than propagating
    /// an error, since a usable (if flagged) result beats a hard failure.
    #[instrument(skip(self, cmd), fields(correlation_id = %cmd.correlation_id, tenant_id = %cmd.tenant_id))]
    pub async fn process_command(&self, cmd: &AICommand, tier: SubscriptionTier) -> Result<AICommandResult, OrchestratorError> {
        let started = Instant::now();
        let clock = self.deps.clock.as_ref();

        self.admit(cmd.tenant_id.as_str(), tier).await?;
        self.deps.usage.check_allowed(&cmd.tenant_id, tier, usage_category_for(cmd.task_type), clock)?;

        let cache_key = CacheKey::from_command(cmd);
        if let Some(cached) = self.deps.cache.get(&cache_key, clock).await {
            if let Ok(result) = serde_json::from_value::<AICommandResult>(cached) {
                info!("returning cached result");
                return Ok(result);
            }
        }

        let selection_context = SelectionContext {
            is_existing_project_analysis: cmd.context.get("is_existing_project_analysis").and_then(serde_json::Value::as_bool).unwrap_or(false),
            user_preference: None,
        };
        let selection = archon_providers::select_model(cmd, &selection_context);

        let region_hint = cmd.context.get("region").and_then(|v| v.as_str());
        let scope = StateScope::tenant(cmd.tenant_id.as_str());
        let rag_hits = self.deps.rag.retrieve(&cmd.prompt_text, Some(cmd.effective_language()), scope).await.unwrap_or_else(|err| {
            warn!(error = %err, "RAG retrieval failed, proceeding with no supporting passages");
            Vec::new()
        });

        let outcome = async {
            let prompt = self.deps.assembler.build(cmd, selection.model_id.provider, &rag_hits)?;
            let dispatch = self.deps.dispatcher.dispatch_prompt(selection, &prompt.text, cmd.complexity).await?;
            let codes = codes_for_region(region_hint.unwrap_or(&prompt.resolved_locale.region));
            let requested_room_count = cmd.context.get("rooms").and_then(|v| v.as_array()).map(Vec::len);
            let validated = archon_validate::OutputValidator::validate(&dispatch.response.text, cmd.task_type, &codes, requested_room_count);
            if !validated.report.is_valid() {
                return Err(OrchestratorError::OutputValidation { message: validated.report.rule_violations.join("; ") });
            }
            Ok((dispatch, validated))
        }
        .await;

        let result = match outcome {
            Ok((dispatch, validated)) => {
                let confidence = validated.value.get("confidence").and_then(serde_json::Value::as_f64).unwrap_or(selection.confidence);
                let requires_human_review = confidence < archon_core::types::result::DEFAULT_REVIEW_CONFIDENCE_THRESHOLD;
                let artifact = shape_success(cmd.task_type, &validated.value, confidence, requires_human_review);
                let mut result = AICommandResult::new(
                    cmd.correlation_id.clone(),
                    AICommandStatus::Succeeded,
                    Some(artifact),
                    confidence,
                    Some(dispatch.response.model_id.clone()),
                    Some(selection.model_id.provider.to_string()),
                    false,
                    Some(validated.report),
                    started.elapsed().as_millis() as u64,
                );
                result.tokens_in = dispatch.response.tokens_in;
                result.tokens_out = dispatch.response.tokens_out;

                if let Ok(value) = serde_json::to_value(&result) {
                    let tags = vec![StateScope::tenant(cmd.tenant_id.as_str()).tag()];
                    if let Err(err) = self.deps.cache.put(cache_key, value, tags, clock).await {
                        warn!(error = %err, "failed to write result to cache");
                    }
                }
                result
            }
            Err(err) => {
                warn!(error = %err, "provider pipeline failed, falling back to deterministic generator");
                let reason = fallback_reason_for(&err);
                let fallback_region = cmd.context.get("region").and_then(|v| v.as_str()).unwrap_or("US");
                let codes = codes_for_region(fallback_region);
                let request = fallback_request_for(cmd);
                let artifact = FallbackGenerator::generate(&request, &codes, reason);

                AICommandResult::new(
                    cmd.correlation_id.clone(),
                    AICommandStatus::FallbackSucceeded,
                    Some(artifact),
                    archon_fallback::layout::FALLBACK_CONFIDENCE,
                    None,
                    None,
                    true,
                    None,
                    started.elapsed().as_millis() as u64,
                )
            }
        };

        self.deps.usage.record(&cmd.tenant_id, usage_category_for(cmd.task_type), clock);
        Ok(result)
    }
}

/// Best-effort mapping from the error that aborted the provider pipeline to
/// the fallback reason recorded on the result, for audit logging.
fn fallback_reason_for(err: &OrchestratorError) -> FallbackReason {
    match err {
        OrchestratorError::ProviderUnavailable { .. } => FallbackReason::CircuitOpen,
        OrchestratorError::OutputValidation { .. } => FallbackReason::ValidationFailed,
        OrchestratorError::Provider { .. } | OrchestratorError::Configuration { .. } => FallbackReason::AllProvidersExhausted,
        _ => FallbackReason::AllProvidersExhausted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::DependencyContainer;
    use archon_cache::{InMemoryL2, ResultCache};
    use archon_core::traits::clock::SystemClock;
    use archon_core::types::command::{Complexity, Locale, TaskType};
    use archon_core::types::tenant::TenantId;
    use archon_prompt::{PromptAssembler, TemplateStore};
    use archon_providers::{abstraction::RawResponse, catalog::ModelId, Provider, ProviderCallError, ProviderConfig, ProviderDispatcher};
    use archon_rag::{ChunkingConfig, LocalEmbedder, RagRetriever, RetrieverConfig};
    use archon_tenancy::UsageAccountant;
    use archon_util::ProviderRateLimiter;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;

    struct ScriptedProvider {
        text: String,
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "vertex_ai"
        }

        async fn call(&self, model: ModelId, _prompt: &str, _config: &ProviderConfig) -> Result<RawResponse, ProviderCallError> {
            Ok(RawResponse { text: self.text.clone(), model_id: model.key(), latency_ms: 1, tokens_in: Some(10), tokens_out: Some(20), finish_reason: Some("stop".to_string()) })
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl Provider for FailingProvider {
        fn name(&self) -> &str {
            "vertex_ai"
        }

        async fn call(&self, _model: ModelId, _prompt: &str, _config: &ProviderConfig) -> Result<RawResponse, ProviderCallError> {
            Err(ProviderCallError::Http { status: 500, body: "boom".to_string() })
        }
    }

    fn command() -> AICommand {
        AICommand {
            correlation_id: "req_1".to_string(),
            tenant_id: TenantId::new("acme"),
            task_type: TaskType::Layout,
            locale: Locale::new("en-US"),
            prompt_text: "design a two bedroom apartment".to_string(),
            context: HashMap::new(),
            complexity: Complexity::Simple,
            file_format: None,
            language: None,
        }
    }

    fn coordinator_with(provider: Arc<dyn Provider>) -> Coordinator {
        let templates = TemplateStore::from_entries(vec![(
            "layout",
            "en",
            archon_prompt::templates::ANY_PROVIDER,
            "Design: {prompt_text}\n{rag_passages}\n{context}".to_string(),
        )]);
        let mut providers: HashMap<&'static str, Arc<dyn Provider>> = HashMap::new();
        providers.insert("vertex_ai", provider);
        let mut configs = HashMap::new();
        configs.insert("vertex_ai", ProviderConfig { base_url: "https://example.test".to_string(), auth_header_env: "VERTEX_AI_TOKEN".to_string(), timeout_ms: 2_000 });

        let deps = DependencyContainer::new(
            Arc::new(RagRetriever::new(ChunkingConfig::default(), Arc::new(LocalEmbedder::default()), RetrieverConfig::default())),
            Arc::new(PromptAssembler::new(templates)),
            Arc::new(ProviderDispatcher::new(providers, configs)),
            Arc::new(ResultCache::new(10, Arc::new(InMemoryL2::default()))),
            Arc::new(UsageAccountant::new()),
            Arc::new(ProviderRateLimiter::new()),
            Arc::new(SystemClock),
        );
        Coordinator::new(deps)
    }

    #[tokio::test]
    async fn successful_provider_response_is_shaped_and_cached() {
        let raw = r#"{"walls": [], "doors": [], "windows": [], "rooms": [{"name": "bedroom", "area": 12.0}, {"name": "bedroom", "area": 11.0}], "confidence": 0.9}"#;
        let coordinator = coordinator_with(Arc::new(ScriptedProvider { text: raw.to_string() }));
        let result = coordinator.process_command(&command(), SubscriptionTier::Professional).await.unwrap();
        assert_eq!(result.status, AICommandStatus::Succeeded);
        assert!(!result.fallback_used);
        assert_eq!(result.tokens_in, Some(10));

        let cached = coordinator.process_command(&command(), SubscriptionTier::Professional).await.unwrap();
        assert_eq!(cached.correlation_id, "req_1");
    }

    #[tokio::test]
    async fn low_confidence_provider_response_still_succeeds_but_requires_review() {
        // The output's own reported confidence (0.5) must drive the review
        // flag, not the router's static per-model confidence estimate
        // (always >= 0.80 for every selectable model).
        let raw = r#"{"walls": [], "doors": [], "windows": [], "rooms": [{"name": "bedroom", "area": 12.0}, {"name": "bedroom", "area": 11.0}], "confidence": 0.5}"#;
        let coordinator = coordinator_with(Arc::new(ScriptedProvider { text: raw.to_string() }));
        let result = coordinator.process_command(&command(), SubscriptionTier::Professional).await.unwrap();
        assert_eq!(result.status, AICommandStatus::Succeeded);
        assert!(!result.fallback_used);
        assert!((result.confidence - 0.5).abs() < f64::EPSILON);
        assert!(result.requires_human_review);
    }

    #[tokio::test]
    async fn provider_failure_falls_back_and_requires_review() {
        let coordinator = coordinator_with(Arc::new(FailingProvider));
        let result = coordinator.process_command(&command(), SubscriptionTier::Professional).await.unwrap();
        assert_eq!(result.status, AICommandStatus::FallbackSucceeded);
        assert!(result.fallback_used);
        assert!(result.requires_human_review);
    }

    #[tokio::test]
    async fn rate_limit_exhaustion_returns_an_error_without_calling_the_provider() {
        // Free tier's per-minute burst capacity (3) is exhausted well before
        // its monthly layout quota; the 4th call in a tight loop trips the
        // admission-boundary rate limiter rather than the usage accountant.
        let coordinator = coordinator_with(Arc::new(FailingProvider));
        let mut cmd = command();
        for i in 0..3 {
            cmd.correlation_id = format!("req_{i}");
            assert!(coordinator.process_command(&cmd, SubscriptionTier::Free).await.is_ok());
        }
        cmd.correlation_id = "req_over".to_string();
        let err = coordinator.process_command(&cmd, SubscriptionTier::Free).await.unwrap_err();
        assert_eq!(err.code(), "RATE_LIMITED");
    }
}
