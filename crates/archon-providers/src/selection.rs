//! ABOUTME: Deterministic model selection table, ported from `AIModelSelector.select_model`
//! ABOUTME: Priority order is fixed; the first matching rule wins (spec §4.5)

use crate::catalog::ModelId;
use archon_core::types::command::{AICommand, Complexity};

/// The chosen model plus why it was chosen, for audit logging.
#[derive(Debug, Clone, Copy)]
pub struct ModelSelection {
    pub model_id: ModelId,
    pub reason: &'static str,
    pub confidence: f64,
}

/// Extra context the original service keys selection on beyond what
/// [`AICommand`] carries directly: whether this is an "existing project"
/// analysis, and an optional explicit provider preference.
#[derive(Debug, Clone, Default)]
pub struct SelectionContext {
    pub is_existing_project_analysis: bool,
    pub user_preference: Option<ModelId>,
}

/// Select the (provider, model) pair for `command`, honoring the same
/// priority order as the original selector: existing-project analysis,
/// then Turkish building-code documents, then CAD/high-complexity tasks,
/// then simple tasks, then an explicit user preference, then the default.
#[must_use]
pub fn select_model(command: &AICommand, context: &SelectionContext) -> ModelSelection {
    if context.is_existing_project_analysis {
        return ModelSelection {
            model_id: ModelId::GITHUB_GPT_4_1,
            reason: "best for comprehensive BIM analysis and improvement recommendations",
            confidence: 0.95,
        };
    }

    let is_turkish_building_code = command.effective_language() == "tr" && command.context.get("document_type").and_then(|v| v.as_str()) == Some("building_code");
    if is_turkish_building_code {
        return ModelSelection {
            model_id: ModelId::VERTEX_GEMINI_FLASH_LITE,
            reason: "optimized for Turkish regulatory documents and building codes",
            confidence: 0.90,
        };
    }

    let is_cad_format = matches!(command.file_format.as_deref(), Some("dwg" | "dxf" | "ifc"));
    if is_cad_format || command.complexity == Complexity::High {
        return ModelSelection {
            model_id: ModelId::GITHUB_GPT_4_1,
            reason: "superior for multi-format CAD parsing and complex reasoning",
            confidence: 0.92,
        };
    }

    let is_prompt_generation = command.context.get("document_type").and_then(|v| v.as_str()) == Some("prompt_generation");
    if command.complexity == Complexity::Simple || is_prompt_generation {
        return ModelSelection {
            model_id: ModelId::VERTEX_GEMINI_FLASH_LITE,
            reason: "cost-effective for simple architectural tasks",
            confidence: 0.85,
        };
    }

    if let Some(preferred) = context.user_preference {
        return ModelSelection {
            model_id: preferred,
            reason: "honoring the caller's provider preference",
            confidence: 0.80,
        };
    }

    ModelSelection {
        model_id: ModelId::GITHUB_GPT_4_1,
        reason: "reliable default for comprehensive architectural analysis",
        confidence: 0.88,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archon_core::types::command::{Locale, TaskType};
    use archon_core::types::tenant::TenantId;
    use std::collections::HashMap;

    fn base_command() -> AICommand {
        AICommand {
            correlation_id: "req_1".to_string(),
            tenant_id: TenantId::new("acme"),
            task_type: TaskType::Layout,
            locale: Locale::new("en-US"),
            prompt_text: "design a studio apartment".to_string(),
            context: HashMap::new(),
            complexity: Complexity::Medium,
            file_format: None,
            language: None,
        }
    }

    #[test]
    fn existing_project_analysis_always_wins() {
        let command = base_command();
        let context = SelectionContext { is_existing_project_analysis: true, user_preference: None };
        let selection = select_model(&command, &context);
        assert_eq!(selection.model_id, ModelId::GITHUB_GPT_4_1);
    }

    #[test]
    fn turkish_building_codes_select_vertex() {
        let mut command = base_command();
        command.language = Some("tr".to_string());
        command.context.insert("document_type".to_string(), serde_json::json!("building_code"));
        let selection = select_model(&command, &SelectionContext::default());
        assert_eq!(selection.model_id, ModelId::VERTEX_GEMINI_FLASH_LITE);
    }

    #[test]
    fn cad_file_formats_select_github_models() {
        let mut command = base_command();
        command.file_format = Some("dwg".to_string());
        let selection = select_model(&command, &SelectionContext::default());
        assert_eq!(selection.model_id, ModelId::GITHUB_GPT_4_1);
    }

    #[test]
    fn simple_complexity_selects_vertex() {
        let mut command = base_command();
        command.complexity = Complexity::Simple;
        let selection = select_model(&command, &SelectionContext::default());
        assert_eq!(selection.model_id, ModelId::VERTEX_GEMINI_FLASH_LITE);
    }

    #[test]
    fn default_falls_through_to_github_models() {
        let command = base_command();
        let selection = select_model(&command, &SelectionContext::default());
        assert_eq!(selection.model_id, ModelId::GITHUB_GPT_4_1);
        assert!((selection.confidence - 0.88).abs() < f64::EPSILON);
    }
}
