//! ABOUTME: `AICommandResult` and the output-validation report it carries
//! ABOUTME: Enforces the confidence/review and fallback/review invariants from the data model

use crate::types::artifact::Artifact;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AICommandStatus {
    Succeeded,
    Failed,
    FallbackSucceeded,
}

/// Outcome of C6 (Output Validator) for a single provider response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub schema_valid: bool,
    pub rule_violations: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.schema_valid && self.rule_violations.is_empty()
    }
}

/// Minimum confidence below which a result is flagged for human review,
/// unless already flagged for another reason. Configurable per spec §3.
pub const DEFAULT_REVIEW_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Final outcome of a single `AICommand`, returned to the caller and
/// persisted (while the cache TTL holds) under `cache/{key}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AICommandResult {
    pub correlation_id: String,
    pub status: AICommandStatus,
    pub artifact: Option<Artifact>,
    pub confidence: f64,
    pub requires_human_review: bool,
    pub model_used: Option<String>,
    pub provider_used: Option<String>,
    pub fallback_used: bool,
    pub validation_report: Option<ValidationReport>,
    pub processing_ms: u64,
    pub tokens_in: Option<u64>,
    pub tokens_out: Option<u64>,
    pub warnings: Vec<String>,
}

impl AICommandResult {
    /// Build a result, enforcing the invariants from spec §3:
    /// `fallback_used ⇒ requires_human_review`, and
    /// `confidence < threshold ⇒ requires_human_review`.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        correlation_id: impl Into<String>,
        status: AICommandStatus,
        artifact: Option<Artifact>,
        confidence: f64,
        model_used: Option<String>,
        provider_used: Option<String>,
        fallback_used: bool,
        validation_report: Option<ValidationReport>,
        processing_ms: u64,
    ) -> Self {
        Self::with_threshold(
            correlation_id,
            status,
            artifact,
            confidence,
            model_used,
            provider_used,
            fallback_used,
            validation_report,
            processing_ms,
            DEFAULT_REVIEW_CONFIDENCE_THRESHOLD,
        )
    }

    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn with_threshold(
        correlation_id: impl Into<String>,
        status: AICommandStatus,
        artifact: Option<Artifact>,
        confidence: f64,
        model_used: Option<String>,
        provider_used: Option<String>,
        fallback_used: bool,
        validation_report: Option<ValidationReport>,
        processing_ms: u64,
        review_threshold: f64,
    ) -> Self {
        let requires_human_review = fallback_used || confidence < review_threshold;
        let mut warnings = Vec::new();
        if fallback_used {
            warnings.push("result produced by deterministic fallback generator".to_string());
        }
        Self {
            correlation_id: correlation_id.into(),
            status,
            artifact,
            confidence,
            requires_human_review,
            model_used,
            provider_used,
            fallback_used,
            validation_report,
            processing_ms,
            tokens_in: None,
            tokens_out: None,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_always_requires_review() {
        let result = AICommandResult::new(
            "req_1",
            AICommandStatus::FallbackSucceeded,
            None,
            0.9,
            None,
            None,
            true,
            None,
            10,
        );
        assert!(result.requires_human_review);
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn low_confidence_requires_review_even_without_fallback() {
        let result = AICommandResult::new(
            "req_2",
            AICommandStatus::Succeeded,
            None,
            0.5,
            Some("gpt-4.1".into()),
            Some("github_models".into()),
            false,
            None,
            10,
        );
        assert!(result.requires_human_review);
    }

    #[test]
    fn high_confidence_without_fallback_does_not_require_review() {
        let result = AICommandResult::new(
            "req_3",
            AICommandStatus::Succeeded,
            None,
            0.95,
            Some("gpt-4.1".into()),
            Some("github_models".into()),
            false,
            None,
            10,
        );
        assert!(!result.requires_human_review);
    }
}
