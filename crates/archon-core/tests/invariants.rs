//! ABOUTME: Integration tests for cross-type invariants in `archon-core`

use archon_core::types::artifact::{Artifact, ValidationArtifact};
use archon_core::types::result::{AICommandResult, AICommandStatus};
use archon_core::{CorrelationId, StateScope};
use chrono::TimeZone;

#[test]
fn fallback_result_always_requires_human_review() {
    let artifact = Artifact::Validation(ValidationArtifact {
        is_compliant: true,
        violations: vec![],
        confidence: 0.95,
        requires_human_review: false,
    });
    let result = AICommandResult::new(
        "req_abc",
        AICommandStatus::FallbackSucceeded,
        Some(artifact),
        0.95,
        None,
        None,
        true,
        None,
        42,
    );
    assert!(result.requires_human_review);
}

#[test]
fn correlation_id_round_trips_through_header() {
    let now = chrono::Utc.with_ymd_and_hms(2026, 7, 28, 12, 0, 0).unwrap();
    let generated = CorrelationId::generate("req", now);
    let parsed = CorrelationId::parse(generated.as_str()).expect("generated id must be valid");
    assert_eq!(generated, parsed);
}

#[test]
fn distinct_scopes_never_share_a_tag() {
    let tenant = StateScope::tenant("acme");
    let project = StateScope::project("acme");
    let document = StateScope::document("acme");
    let tags = [tenant.tag(), project.tag(), document.tag()];
    let unique: std::collections::HashSet<_> = tags.iter().collect();
    assert_eq!(unique.len(), tags.len());
}
