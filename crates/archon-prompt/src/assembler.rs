//! ABOUTME: Prompt Assembler (C4): resolves a template and fills it with request + RAG context

use crate::locale::{self, ResolvedLocale};
use crate::templates::TemplateStore;
use archon_core::error::{OrchestratorError, Result};
use archon_core::types::command::AICommand;
use archon_rag::SimilarityResult;
use serde::Serialize;
use std::collections::BTreeMap;

/// RAG passages with a minimum relevance score, injected into the prompt.
pub const RAG_TOP_K: usize = 5;
pub const RAG_MIN_SCORE: f32 = 0.3;

/// Parameters governing the provider call, selected alongside the template.
#[derive(Debug, Clone, Serialize)]
pub struct InvocationParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub response_format: &'static str,
}

impl Default for InvocationParams {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 4096,
            response_format: "json_object",
        }
    }
}

/// Assembled prompt plus the parameter bundle the dispatcher should use.
#[derive(Debug, Clone)]
pub struct AssembledPrompt {
    pub text: String,
    pub params: InvocationParams,
    pub resolved_locale: ResolvedLocale,
}

pub struct PromptAssembler {
    templates: TemplateStore,
}

impl PromptAssembler {
    #[must_use]
    pub fn new(templates: TemplateStore) -> Self {
        Self { templates }
    }

    /// Build the final prompt for `cmd`, targeting `provider_family`, with
    /// `rag_hits` already filtered to [`RAG_MIN_SCORE`] and truncated to
    /// [`RAG_TOP_K`] by the caller (the retriever enforces both).
    pub fn build(&self, cmd: &AICommand, provider_family: &str, rag_hits: &[SimilarityResult]) -> Result<AssembledPrompt> {
        let language = cmd.effective_language().to_string();
        let region_hint = cmd.context.get("region").and_then(|v| v.as_str());
        let resolved_locale = locale::resolve(&language, region_hint);

        let template = self
            .templates
            .resolve(cmd.task_type, &language, provider_family)
            .ok_or_else(|| OrchestratorError::Configuration {
                message: format!("no prompt template found for task {:?} language {language}", cmd.task_type),
            })?;

        let rag_passages = render_rag_passages(rag_hits);
        let context_block = render_context(&cmd.context);

        let text = template
            .replace("{prompt_text}", &cmd.prompt_text)
            .replace("{region}", &resolved_locale.region)
            .replace("{language}", &resolved_locale.language)
            .replace(
                "{measurement_system}",
                match resolved_locale.measurement_system {
                    locale::MeasurementSystem::Metric => "metric",
                    locale::MeasurementSystem::Imperial => "imperial",
                },
            )
            .replace("{rag_passages}", &rag_passages)
            .replace("{context}", &context_block);

        Ok(AssembledPrompt {
            text,
            params: InvocationParams::default(),
            resolved_locale,
        })
    }
}

fn render_rag_passages(hits: &[SimilarityResult]) -> String {
    if hits.is_empty() {
        return "(no supporting documents found)".to_string();
    }
    hits.iter()
        .take(RAG_TOP_K)
        .filter(|hit| hit.similarity >= RAG_MIN_SCORE)
        .enumerate()
        .map(|(i, hit)| format!("[{}] {}", i + 1, hit.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_context(context: &std::collections::HashMap<String, serde_json::Value>) -> String {
    let sorted: BTreeMap<&String, &serde_json::Value> = context.iter().collect();
    sorted
        .into_iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::ANY_PROVIDER;
    use archon_core::types::command::{Complexity, Locale, TaskType};
    use archon_core::types::tenant::TenantId;
    use std::collections::HashMap;

    fn command() -> AICommand {
        AICommand {
            correlation_id: "req_1".to_string(),
            tenant_id: TenantId::new("acme"),
            task_type: TaskType::Layout,
            locale: Locale::new("en-US"),
            prompt_text: "two bedroom apartment".to_string(),
            context: HashMap::new(),
            complexity: Complexity::Simple,
            file_format: None,
            language: None,
        }
    }

    #[test]
    fn build_substitutes_request_and_locale_fields() {
        let templates = TemplateStore::from_entries(vec![(
            "layout",
            "en",
            ANY_PROVIDER,
            "Design: {prompt_text}\nRegion: {region}\nPassages:\n{rag_passages}".to_string(),
        )]);
        let assembler = PromptAssembler::new(templates);
        let prompt = assembler.build(&command(), "vertex_ai", &[]).unwrap();
        assert!(prompt.text.contains("two bedroom apartment"));
        assert!(prompt.text.contains("(no supporting documents found)"));
    }

    #[test]
    fn missing_template_is_a_configuration_error() {
        let templates = TemplateStore::from_entries(vec![]);
        let assembler = PromptAssembler::new(templates);
        assert!(assembler.build(&command(), "vertex_ai", &[]).is_err());
    }
}
