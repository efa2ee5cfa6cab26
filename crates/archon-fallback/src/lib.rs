//! ABOUTME: Fallback Generator (C7): deterministic rule-based output when the
//! ABOUTME: provider path is unavailable, exhausted, or fails validation

pub mod catalog;
pub mod compliance;
pub mod layout;
pub mod room;

use archon_core::regional::RegionalCodes;
use archon_core::types::artifact::Artifact;
use archon_core::types::command::TaskType;
use tracing::{info, instrument};

pub use compliance::{check_compliance, ComplianceInput};
pub use layout::{generate_layout, generate_layout_with, LayoutRequest, FALLBACK_CONFIDENCE};
pub use room::{generate_room, generate_room_detail, generate_room_openings, generate_room_with, RoomRequest};

/// Why the orchestrator reached for the deterministic path, carried through
/// to the command result so the fallback is auditable (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    AllProvidersExhausted,
    ValidationFailed,
    CircuitOpen,
    Timeout,
}

impl FallbackReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllProvidersExhausted => "all_providers_exhausted",
            Self::ValidationFailed => "validation_failed",
            Self::CircuitOpen => "circuit_open",
            Self::Timeout => "timeout",
        }
    }
}

/// What the generator needs to produce an artifact without calling a
/// provider: the task being served and whatever structured program the
/// request carried.
#[derive(Debug, Clone)]
pub enum FallbackRequest {
    Layout(LayoutRequest),
    Room(RoomRequest),
    Validate(Vec<ComplianceInput>),
}

impl FallbackRequest {
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        match self {
            Self::Layout(_) => TaskType::Layout,
            Self::Room(_) => TaskType::Room,
            Self::Validate(_) => TaskType::Validate,
        }
    }
}

/// Deterministic rule-based generator: always succeeds, never calls a
/// provider, and always marks its output `requires_human_review`.
pub struct FallbackGenerator;

impl FallbackGenerator {
    /// Produce a structured [`Artifact`] for `request`, logging why the
    /// fallback path was taken.
    #[instrument(skip(request, codes))]
    pub fn generate(request: &FallbackRequest, codes: &RegionalCodes, reason: FallbackReason) -> Artifact {
        info!(reason = reason.as_str(), task = request.task_type().as_str(), "generating deterministic fallback output");
        match request {
            FallbackRequest::Layout(layout_request) => Artifact::Layout(generate_layout(layout_request)),
            FallbackRequest::Room(room_request) => Artifact::Room(generate_room(room_request)),
            FallbackRequest::Validate(rooms) => Artifact::Validation(check_compliance(rooms, codes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archon_core::codes_for_region;

    #[test]
    fn layout_request_reports_layout_task_type() {
        let request = FallbackRequest::Layout(LayoutRequest { total_area_m2: 60.0, rooms: Vec::new() });
        assert_eq!(request.task_type(), TaskType::Layout);
    }

    #[test]
    fn generated_artifact_always_requires_review() {
        let request = FallbackRequest::Room(RoomRequest { room_type: "bedroom".to_string(), area_m2: None });
        let artifact = FallbackGenerator::generate(&request, &codes_for_region("US"), FallbackReason::AllProvidersExhausted);
        assert!(artifact.requires_human_review());
        assert!(artifact.confidence() < 0.7);
    }

    #[test]
    fn validate_fallback_uses_regional_minimums() {
        let rooms = vec![ComplianceInput { room_type: "bedroom".to_string(), area_m2: 2.0, door_width_mm: None }];
        let request = FallbackRequest::Validate(rooms);
        let artifact = FallbackGenerator::generate(&request, &codes_for_region("EU"), FallbackReason::ValidationFailed);
        let Artifact::Validation(validation) = artifact else {
            panic!("expected a validation artifact");
        };
        assert!(!validation.is_compliant);
    }
}
