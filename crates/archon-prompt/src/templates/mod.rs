//! ABOUTME: Template storage and selection: loads prompt templates from an external directory
//! ABOUTME: so adding a language or provider variant never requires a recompile

use archon_core::error::{OrchestratorError, Result};
use archon_core::types::command::TaskType;
use std::collections::HashMap;
use std::path::Path;

/// Wildcard provider family used when a template applies to every provider.
pub const ANY_PROVIDER: &str = "default";

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct TemplateKey {
    task: &'static str,
    language: String,
    provider_family: String,
}

/// Loaded prompt templates, keyed by `(task, language, provider_family)`.
///
/// Files are named `{task}.{language}.{provider_family}.txt`, e.g.
/// `layout.tr.default.txt` or `layout.en.github_models.txt`. The directory
/// is re-readable at any time via [`TemplateStore::load_from_dir`]; nothing
/// is compiled in.
pub struct TemplateStore {
    templates: HashMap<TemplateKey, String>,
}

impl TemplateStore {
    /// Load every `*.txt` file in `dir` whose name parses as
    /// `{task}.{language}.{provider}.txt`. Files that don't match the
    /// pattern are skipped (not an error), so stray README-style files in
    /// the same directory are harmless.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let mut templates = HashMap::new();

        let entries = std::fs::read_dir(dir).map_err(|e| OrchestratorError::Configuration {
            message: format!("failed to read template directory {}: {e}", dir.display()),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| OrchestratorError::Configuration {
                message: format!("failed to read template directory entry: {e}"),
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let parts: Vec<&str> = stem.split('.').collect();
            let (task_str, language, provider_family) = match parts.as_slice() {
                [task_str, language, provider_family] => (*task_str, *language, *provider_family),
                _ => continue,
            };
            let Some(task) = task_name(task_str) else { continue };

            let content = std::fs::read_to_string(&path).map_err(|e| OrchestratorError::Configuration {
                message: format!("failed to read template {}: {e}", path.display()),
            })?;

            templates.insert(
                TemplateKey {
                    task,
                    language: language.to_string(),
                    provider_family: provider_family.to_string(),
                },
                content,
            );
        }

        Ok(Self { templates })
    }

    /// In-memory store, for tests and for the built-in default fallback.
    #[must_use]
    pub fn from_entries(entries: Vec<(&'static str, &str, &str, String)>) -> Self {
        let templates = entries
            .into_iter()
            .map(|(task, language, provider_family, content)| {
                (
                    TemplateKey {
                        task,
                        language: language.to_string(),
                        provider_family: provider_family.to_string(),
                    },
                    content,
                )
            })
            .collect();
        Self { templates }
    }

    /// Resolve a template for `(task, language, provider_family)`, with the
    /// fallback order from spec §4.4: exact match, then
    /// `(task, language, *)`, then `(task, en, *)`.
    #[must_use]
    pub fn resolve(&self, task: TaskType, language: &str, provider_family: &str) -> Option<&str> {
        let task = task.as_str();

        if let Some(t) = self.lookup(task, language, provider_family) {
            return Some(t);
        }
        if let Some(t) = self.lookup(task, language, ANY_PROVIDER) {
            return Some(t);
        }
        if language != "en" {
            if let Some(t) = self.lookup(task, "en", ANY_PROVIDER) {
                return Some(t);
            }
        }
        None
    }

    fn lookup(&self, task: &str, language: &str, provider_family: &str) -> Option<&str> {
        self.templates
            .iter()
            .find(|(key, _)| key.task == task && key.language == language && key.provider_family == provider_family)
            .map(|(_, v)| v.as_str())
    }
}

fn task_name(raw: &str) -> Option<&'static str> {
    match raw {
        "layout" => Some("layout"),
        "room" => Some("room"),
        "validate" => Some("validate"),
        "analyze" => Some("analyze"),
        "custom" => Some("custom"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TemplateStore {
        TemplateStore::from_entries(vec![
            ("layout", "en", ANY_PROVIDER, "generic layout template".to_string()),
            ("layout", "tr", ANY_PROVIDER, "turkce sablon".to_string()),
            ("layout", "en", "github_models", "github-specific template".to_string()),
        ])
    }

    #[test]
    fn exact_match_wins_over_wildcard_provider() {
        let store = store();
        assert_eq!(store.resolve(TaskType::Layout, "en", "github_models"), Some("github-specific template"));
    }

    #[test]
    fn falls_back_to_language_wildcard_provider() {
        let store = store();
        assert_eq!(store.resolve(TaskType::Layout, "en", "vertex_ai"), Some("generic layout template"));
    }

    #[test]
    fn falls_back_to_english_when_language_missing() {
        let store = store();
        assert_eq!(store.resolve(TaskType::Layout, "de", "vertex_ai"), Some("generic layout template"));
    }

    #[test]
    fn exact_language_wins_over_english_fallback() {
        let store = store();
        assert_eq!(store.resolve(TaskType::Layout, "tr", "vertex_ai"), Some("turkce sablon"));
    }

    #[test]
    fn missing_task_resolves_to_none() {
        let store = store();
        assert_eq!(store.resolve(TaskType::Room, "en", ANY_PROVIDER), None);
    }
}
