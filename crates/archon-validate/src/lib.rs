//! ABOUTME: Output Validator (C6): structural extraction, schema, and domain rules
//! ABOUTME: Three stages feed a single `ValidationReport`; any stage-1/2 failure is an error

pub mod json_extract;
pub mod rules;
pub mod schema;

use archon_core::regional::RegionalCodes;
use archon_core::types::command::TaskType;
use archon_core::types::result::ValidationReport;
use serde_json::Value;
use tracing::instrument;

/// Parsed + validated provider output, ready for the coordinator to shape
/// into an [`archon_core::types::artifact::Artifact`].
pub struct ValidatedOutput {
    pub value: Value,
    pub report: ValidationReport,
}

/// Runs all three validation stages against a raw provider response.
pub struct OutputValidator;

impl OutputValidator {
    /// Stage 1 (structural) → stage 2 (schema) → stage 3 (domain rules).
    ///
    /// A stage-1 failure (`InvalidJSON`) or stage-2 failure (schema
    /// mismatch) is recorded as a rule violation on the report rather than
    /// propagated as an error, so the coordinator always gets a report to
    /// inspect uniformly; `report.is_valid()` is the single source of truth
    /// for whether to proceed or fall back (spec §4.6).
    #[instrument(skip(raw, codes))]
    #[must_use]
    pub fn validate(raw: &str, task: TaskType, codes: &RegionalCodes, requested_room_count: Option<usize>) -> ValidatedOutput {
        let parsed = match json_extract::extract_json_object(raw) {
            Ok(value) => value,
            Err(err) => {
                return ValidatedOutput {
                    value: Value::Null,
                    report: ValidationReport {
                        schema_valid: false,
                        rule_violations: vec![format!("InvalidJSON: {err}")],
                        warnings: Vec::new(),
                    },
                };
            }
        };

        let schema_violations = schema::validate_shape(task, &parsed);
        if !schema_violations.is_empty() {
            return ValidatedOutput {
                value: parsed,
                report: ValidationReport {
                    schema_valid: false,
                    rule_violations: schema_violations,
                    warnings: Vec::new(),
                },
            };
        }

        let outcome = rules::check_domain_rules(task, &parsed, codes, requested_room_count);
        ValidatedOutput {
            value: parsed,
            report: ValidationReport {
                schema_valid: true,
                rule_violations: outcome.errors,
                warnings: outcome.warnings,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archon_core::codes_for_region;

    #[test]
    fn invalid_json_is_not_schema_valid_and_carries_a_violation() {
        let result = OutputValidator::validate("{ walls: [", TaskType::Layout, &codes_for_region("US"), None);
        assert!(!result.report.is_valid());
        assert!(result.report.rule_violations[0].starts_with("InvalidJSON"));
    }

    #[test]
    fn well_formed_valid_layout_passes_all_stages() {
        let raw = r#"```json
        {"walls": [], "doors": [], "windows": [],
         "rooms": [{"name": "bedroom", "area": 12.0}], "confidence": 0.85}
        ```"#;
        let result = OutputValidator::validate(raw, TaskType::Layout, &codes_for_region("US"), None);
        assert!(result.report.is_valid());
    }

    #[test]
    fn domain_rule_violation_marks_invalid_even_with_good_schema() {
        let raw = r#"{"walls": [], "doors": [], "windows": [], "rooms": [], "confidence": 1.5}"#;
        let result = OutputValidator::validate(raw, TaskType::Layout, &codes_for_region("US"), None);
        assert!(result.report.schema_valid);
        assert!(!result.report.is_valid());
    }
}
