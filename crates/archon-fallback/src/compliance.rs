//! ABOUTME: Deterministic compliance check (C7), the fallback path for `validate` tasks
//! ABOUTME: Rule table mirrors `archon-validate`'s domain rules but runs with no provider output

use crate::layout::FALLBACK_CONFIDENCE;
use archon_core::regional::RegionalCodes;
use archon_core::types::artifact::ValidationArtifact;

/// The minimal room facts the deterministic checker needs; the coordinator
/// extracts these from whatever artifact is being re-checked.
#[derive(Debug, Clone)]
pub struct ComplianceInput {
    pub room_type: String,
    pub area_m2: f64,
    pub door_width_mm: Option<i64>,
}

/// Run the same regional minimums the validator enforces, without needing a
/// provider response to parse — used when even the validator's retry budget
/// is exhausted (spec §4.7's last resort).
#[must_use]
pub fn check_compliance(rooms: &[ComplianceInput], codes: &RegionalCodes) -> ValidationArtifact {
    let mut violations = Vec::new();

    for room in rooms {
        let minimum = codes.min_room_size(&room.room_type);
        if room.area_m2 < minimum {
            violations.push(format!(
                "room '{}' area {:.1}m² is below the {} regional minimum of {minimum:.1}m²",
                room.room_type, room.area_m2, codes.region
            ));
        }
        if let Some(width) = room.door_width_mm {
            if width < codes.accessible_width_mm {
                violations.push(format!(
                    "room '{}' door clear width {width}mm is below the accessible minimum of {}mm",
                    room.room_type, codes.accessible_width_mm
                ));
            }
        }
    }

    ValidationArtifact {
        is_compliant: violations.is_empty(),
        violations,
        confidence: FALLBACK_CONFIDENCE,
        requires_human_review: true,
    }
}
