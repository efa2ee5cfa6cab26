//! ABOUTME: Stage 2 (schema) validation: the minimum shape each task type must satisfy
//! ABOUTME: Schemas are intentionally permissive (`additionalProperties: true`) per spec §4.6

use archon_core::types::command::TaskType;
use jsonschema::JSONSchema;
use serde_json::{json, Value};
use std::sync::OnceLock;

fn layout_schema() -> &'static JSONSchema {
    static SCHEMA: OnceLock<JSONSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let schema = json!({
            "type": "object",
            "required": ["walls", "doors", "windows", "rooms", "confidence"],
            "properties": {
                "walls": {"type": "array"},
                "doors": {"type": "array"},
                "windows": {"type": "array"},
                "rooms": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["name", "area"],
                    },
                },
                "confidence": {"type": "number"},
            },
        });
        JSONSchema::compile(&schema).expect("layout schema is valid")
    })
}

fn room_schema() -> &'static JSONSchema {
    static SCHEMA: OnceLock<JSONSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let schema = json!({
            "type": "object",
            "required": ["dimensions", "furniture", "lighting", "materials", "confidence"],
            "properties": {
                "confidence": {"type": "number"},
            },
        });
        JSONSchema::compile(&schema).expect("room schema is valid")
    })
}

fn validate_schema() -> &'static JSONSchema {
    static SCHEMA: OnceLock<JSONSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let schema = json!({
            "type": "object",
            "required": ["is_valid", "compliance_score", "errors", "warnings"],
            "properties": {
                "is_valid": {"type": "boolean"},
                "compliance_score": {"type": "number"},
                "errors": {"type": "array"},
                "warnings": {"type": "array"},
            },
        });
        JSONSchema::compile(&schema).expect("validate schema is valid")
    })
}

/// Minimum shape for `task`. `analyze`/`custom` have no fixed schema (spec
/// §6's structured-artifact list only defines layout/room/validate); any
/// well-formed JSON object passes for those tasks.
#[must_use]
pub fn schema_for(task: TaskType) -> Option<&'static JSONSchema> {
    match task {
        TaskType::Layout => Some(layout_schema()),
        TaskType::Room => Some(room_schema()),
        TaskType::Validate => Some(validate_schema()),
        TaskType::Analyze | TaskType::Custom => None,
    }
}

/// Validate `value` against the minimum shape for `task`, returning the
/// list of schema-violation messages (empty means schema-valid).
#[must_use]
pub fn validate_shape(task: TaskType, value: &Value) -> Vec<String> {
    let Some(schema) = schema_for(task) else {
        return if value.is_object() {
            Vec::new()
        } else {
            vec!["output is not a JSON object".to_string()]
        };
    };
    match schema.validate(value) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.map(|e| e.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_layout_passes() {
        let value = json!({
            "walls": [], "doors": [], "windows": [],
            "rooms": [{"name": "bedroom", "area": 12.0}],
            "confidence": 0.8
        });
        assert!(validate_shape(TaskType::Layout, &value).is_empty());
    }

    #[test]
    fn layout_missing_rooms_fails() {
        let value = json!({"walls": [], "doors": [], "windows": [], "confidence": 0.8});
        assert!(!validate_shape(TaskType::Layout, &value).is_empty());
    }

    #[test]
    fn analyze_task_accepts_any_object() {
        let value = json!({"anything": "goes"});
        assert!(validate_shape(TaskType::Analyze, &value).is_empty());
    }

    #[test]
    fn analyze_task_rejects_non_object() {
        let value = json!([1, 2, 3]);
        assert!(!validate_shape(TaskType::Analyze, &value).is_empty());
    }
}
