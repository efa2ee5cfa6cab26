//! ABOUTME: The `AICommand` request type and its constituent enums
//! ABOUTME: This is the single unit of work the orchestration coordinator processes

use crate::types::tenant::TenantId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of AI task being requested; drives template selection (C4) and
/// output schema selection (C6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Layout,
    Room,
    Validate,
    Analyze,
    Custom,
}

impl TaskType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::Room => "room",
            Self::Validate => "validate",
            Self::Analyze => "analyze",
            Self::Custom => "custom",
        }
    }
}

/// Caller-declared complexity, used for provider/model selection and for
/// classifying workflow templates (`archon-workflows`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Medium,
    High,
}

/// BCP-47 locale tag, e.g. `"en-US"`, `"tr-TR"`. Stored verbatim; the
/// language subtag (lowercased prefix before `-`) is what prompt/chunker
/// localization keys off of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale(String);

impl Locale {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The primary language subtag, lowercased (`"tr-TR"` -> `"tr"`).
    #[must_use]
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self("en-US".to_string())
    }
}

/// A single natural-language design request submitted by a desktop client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AICommand {
    pub correlation_id: String,
    pub tenant_id: TenantId,
    pub task_type: TaskType,
    pub locale: Locale,
    pub prompt_text: String,
    #[serde(default)]
    pub context: HashMap<String, serde_json::Value>,
    pub complexity: Complexity,
    pub file_format: Option<String>,
    pub language: Option<String>,
}

impl AICommand {
    /// The language to localize templates/chunking with: the explicit
    /// `language` field if present, else the locale's language subtag.
    #[must_use]
    pub fn effective_language(&self) -> &str {
        self.language.as_deref().unwrap_or_else(|| self.locale.language())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_language_extracts_subtag() {
        assert_eq!(Locale::new("tr-TR").language(), "tr");
        assert_eq!(Locale::new("en").language(), "en");
    }

    #[test]
    fn effective_language_prefers_explicit_field() {
        let cmd = AICommand {
            correlation_id: "req_1".into(),
            tenant_id: TenantId::new("acme"),
            task_type: TaskType::Layout,
            locale: Locale::new("en-US"),
            prompt_text: "design a 2 bedroom apartment".into(),
            context: HashMap::new(),
            complexity: Complexity::Simple,
            file_format: None,
            language: Some("tr".into()),
        };
        assert_eq!(cmd.effective_language(), "tr");
    }
}
