//! ABOUTME: Stable cache key derivation: same semantic request, same key
//! ABOUTME: regardless of correlation id, timestamp, or context field order

use archon_core::types::command::AICommand;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// A content-derived cache key. Two [`AICommand`]s that differ only in
/// `correlation_id` hash to the same key (spec §4.8): the correlation id
/// identifies a *request*, not the *work* being requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive the key from the parts of a command that determine its
    /// output: task type, normalized prompt text, context (sorted by key so
    /// insertion order doesn't matter), and locale.
    #[must_use]
    pub fn from_command(command: &AICommand) -> Self {
        Self::from_parts(command.task_type.as_str(), &command.prompt_text, &command.context, command.locale.as_str())
    }

    #[must_use]
    pub fn from_parts(task_type: &str, prompt_text: &str, context: &std::collections::HashMap<String, Value>, locale: &str) -> Self {
        let normalized_prompt = prompt_text.trim().to_ascii_lowercase();

        let mut context_entries: Vec<(&String, &Value)> = context.iter().collect();
        context_entries.sort_by_key(|(key, _)| key.as_str());
        let context_json = serde_json::to_string(&context_entries).unwrap_or_default();

        let mut hasher = Sha256::new();
        hasher.update(task_type.as_bytes());
        hasher.update(b"\0");
        hasher.update(normalized_prompt.as_bytes());
        hasher.update(b"\0");
        hasher.update(context_json.as_bytes());
        hasher.update(b"\0");
        hasher.update(locale.as_bytes());

        Self(format!("{:x}", hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archon_core::types::command::{Complexity, Locale, TaskType};
    use archon_core::types::tenant::TenantId;
    use std::collections::HashMap;

    fn command(correlation_id: &str) -> AICommand {
        AICommand {
            correlation_id: correlation_id.to_string(),
            tenant_id: TenantId::new("acme"),
            task_type: TaskType::Layout,
            locale: Locale::new("en-US"),
            prompt_text: "  Design a 2 bedroom apartment  ".to_string(),
            context: HashMap::new(),
            complexity: Complexity::Simple,
            file_format: None,
            language: None,
        }
    }

    #[test]
    fn differing_correlation_ids_produce_the_same_key() {
        let a = CacheKey::from_command(&command("req_1"));
        let b = CacheKey::from_command(&command("req_2"));
        assert_eq!(a, b);
    }

    #[test]
    fn prompt_text_is_case_and_whitespace_normalized() {
        let mut cmd = command("req_1");
        cmd.prompt_text = "design a 2 bedroom apartment".to_string();
        let normalized = CacheKey::from_command(&cmd);
        assert_eq!(normalized, CacheKey::from_command(&command("req_1")));
    }

    #[test]
    fn context_key_order_does_not_affect_the_hash() {
        let mut first = HashMap::new();
        first.insert("b".to_string(), Value::from(2));
        first.insert("a".to_string(), Value::from(1));

        let mut second = HashMap::new();
        second.insert("a".to_string(), Value::from(1));
        second.insert("b".to_string(), Value::from(2));

        let key_a = CacheKey::from_parts("layout", "prompt", &first, "en-US");
        let key_b = CacheKey::from_parts("layout", "prompt", &second, "en-US");
        assert_eq!(key_a, key_b);
    }

    #[test]
    fn differing_locale_produces_a_different_key() {
        let key_a = CacheKey::from_parts("layout", "prompt", &HashMap::new(), "en-US");
        let key_b = CacheKey::from_parts("layout", "prompt", &HashMap::new(), "tr-TR");
        assert_ne!(key_a, key_b);
    }
}
