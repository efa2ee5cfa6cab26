//! ABOUTME: Provider Dispatcher (C5): model selection plus resilient dispatch
//! ABOUTME: Wraps each call in the shared circuit breaker, enforces a per-complexity timeout

use crate::abstraction::{Provider, ProviderCallError, ProviderConfig, RawResponse};
use crate::catalog::ModelId;
use crate::selection::{select_model, ModelSelection, SelectionContext};
use archon_core::error::OrchestratorError;
use archon_core::types::command::{AICommand, Complexity};
use archon_util::{CircuitBreakerError, CircuitBreakerManager, ServicePresets};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Maximum attempts per dispatched request, matching the original's basic
/// retry loop plus the spec's explicit retry budget (spec §4.5).
pub const MAX_ATTEMPTS: u32 = 3;

/// Per-complexity request timeout (spec §4.5): simple tasks get a tight
/// budget, high-complexity tasks (CAD parsing, long-context reasoning) get
/// more room, capped at 8s to bound tail latency.
#[must_use]
pub const fn timeout_for(complexity: Complexity) -> std::time::Duration {
    match complexity {
        Complexity::Simple => std::time::Duration::from_millis(2_000),
        Complexity::Medium => std::time::Duration::from_millis(5_000),
        Complexity::High => std::time::Duration::from_millis(8_000),
    }
}

/// The result of a dispatched request: the chosen model, why it was
/// chosen, and the provider's raw output ready for `archon-validate`.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub selection_reason: &'static str,
    pub response: RawResponse,
}

pub struct ProviderDispatcher {
    providers: HashMap<&'static str, Arc<dyn Provider>>,
    configs: HashMap<&'static str, ProviderConfig>,
    circuits: CircuitBreakerManager,
}

impl ProviderDispatcher {
    #[must_use]
    pub fn new(providers: HashMap<&'static str, Arc<dyn Provider>>, configs: HashMap<&'static str, ProviderConfig>) -> Self {
        Self { providers, configs, circuits: CircuitBreakerManager::with_default_config(ServicePresets::http_api) }
    }

    /// Select a model for `command` and dispatch with retry-with-backoff,
    /// bounded by the complexity timeout and guarded by a per-(provider,
    /// model) circuit breaker.
    #[instrument(skip(self, command, context))]
    pub async fn dispatch(&self, command: &AICommand, context: &SelectionContext) -> Result<DispatchOutcome, OrchestratorError> {
        let selection = select_model(command, context);
        info!(provider = selection.model_id.provider, model = selection.model_id.model, reason = selection.reason, "dispatching to provider");

        let response = self.call_with_retry(selection, &command.prompt_text, command.complexity).await?;
        Ok(DispatchOutcome { selection_reason: selection.reason, response })
    }

    /// Dispatch an already-assembled prompt (spec §4.10 step 6: the
    /// coordinator calls [`select_model`] itself so the prompt assembler
    /// (C4) can target the chosen provider family, then invokes this with
    /// the assembled text rather than the bare `AICommand.prompt_text`).
    #[instrument(skip(self, selection, prompt))]
    pub async fn dispatch_prompt(&self, selection: ModelSelection, prompt: &str, complexity: Complexity) -> Result<DispatchOutcome, OrchestratorError> {
        let response = self.call_with_retry(selection, prompt, complexity).await?;
        Ok(DispatchOutcome { selection_reason: selection.reason, response })
    }

    async fn call_with_retry(&self, selection: ModelSelection, prompt: &str, complexity: Complexity) -> Result<RawResponse, OrchestratorError> {
        let model_id = selection.model_id;
        let provider = self.providers.get(model_id.provider).ok_or_else(|| OrchestratorError::Configuration { message: format!("no provider registered for {}", model_id.provider) })?;
        let config = self.configs.get(model_id.provider).ok_or_else(|| OrchestratorError::Configuration { message: format!("no config for provider {}", model_id.provider) })?;
        let mut config = config.clone();
        config.timeout_ms = timeout_for(complexity).as_millis() as u64;

        let circuit_key = model_id.key();
        let mut last_error: Option<ProviderCallError> = None;

        for attempt in 0..MAX_ATTEMPTS {
            let outcome = self
                .circuits
                .execute(&circuit_key, || {
                    let provider = Arc::clone(provider);
                    let config = config.clone();
                    let prompt = prompt.to_string();
                    Box::pin(async move { provider.call(model_id, &prompt, &config).await })
                })
                .await;

            match outcome {
                Ok(response) => return Ok(response),
                Err(CircuitBreakerError::Open) => {
                    return Err(OrchestratorError::ProviderUnavailable { provider: model_id.provider.to_string(), model: model_id.model.to_string() });
                }
                Err(CircuitBreakerError::Inner(err)) => {
                    let retryable = err.is_retryable();
                    warn!(attempt, provider = model_id.provider, error = %err, "provider call failed");
                    last_error = Some(err);
                    if !retryable || attempt + 1 == MAX_ATTEMPTS {
                        break;
                    }
                    let delay = archon_util::BackoffStrategy::Exponential { base_ms: 500 }.calculate_delay_with_jitter(attempt);
                    tokio::time::sleep(delay.min(std::time::Duration::from_secs(8))).await;
                }
            }
        }

        let message = last_error.map_or_else(|| "exhausted retries".to_string(), |err| err.to_string());
        Err(OrchestratorError::Provider { message, retryable: true })
    }
}
