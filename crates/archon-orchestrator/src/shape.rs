//! ABOUTME: Converts a validated provider JSON value into a structured `Artifact`
//! ABOUTME: Tries a strict typed decode first; degrades to geometry synthesis on partial shapes

use archon_core::types::artifact::{Artifact, LayoutArtifact, RoomArtifact, ValidationArtifact};
use archon_core::types::command::TaskType;
use archon_fallback::layout::{generate_layout_with, LayoutRequest};
use archon_fallback::room::{generate_room_detail, generate_room_with, RoomRequest};
use serde_json::Value;

/// Shape a stage-3-validated provider response into the task's `Artifact`.
///
/// The prompt assembler's `response_schema_hint` (spec §4.4) asks providers
/// to emit the full structured shape (ids, wall/door/window geometry in
/// mm). Well-behaved providers round-trip through a strict decode; a
/// provider that only honors the minimum stage-2 schema (spec §4.6) still
/// produces a usable artifact by synthesizing the missing geometry from the
/// room program it did supply.
#[must_use]
pub fn shape_success(task: TaskType, value: &Value, confidence: f64, requires_human_review: bool) -> Artifact {
    match task {
        TaskType::Layout => Artifact::Layout(shape_layout(value, confidence, requires_human_review)),
        TaskType::Room => Artifact::Room(shape_room(value, confidence, requires_human_review)),
        TaskType::Validate => Artifact::Validation(shape_validation(value, confidence, requires_human_review)),
        TaskType::Analyze | TaskType::Custom => Artifact::Generic(value.clone()),
    }
}

fn shape_layout(value: &Value, confidence: f64, requires_human_review: bool) -> LayoutArtifact {
    if let Ok(mut artifact) = serde_json::from_value::<LayoutArtifact>(value.clone()) {
        artifact.confidence = confidence;
        artifact.requires_human_review = requires_human_review;
        return artifact;
    }

    let rooms = value
        .get("rooms")
        .and_then(Value::as_array)
        .map(|rooms| {
            rooms
                .iter()
                .map(|room| {
                    let name = room
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or("room")
                        .to_ascii_lowercase()
                        .replace(' ', "_");
                    (name, 1u32)
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let total_area_m2 = value
        .get("rooms")
        .and_then(Value::as_array)
        .map(|rooms| rooms.iter().filter_map(|room| room.get("area").and_then(Value::as_f64)).sum())
        .filter(|area: &f64| *area > 0.0)
        .unwrap_or(80.0);

    generate_layout_with(&LayoutRequest { total_area_m2, rooms }, confidence, requires_human_review)
}

fn shape_room(value: &Value, confidence: f64, requires_human_review: bool) -> RoomArtifact {
    if let Ok(mut artifact) = serde_json::from_value::<RoomArtifact>(value.clone()) {
        artifact.confidence = confidence;
        artifact.requires_human_review = requires_human_review;
        return artifact;
    }

    let room_type = value
        .get("room_type")
        .and_then(Value::as_str)
        .or_else(|| value.get("dimensions").and_then(|d| d.get("room_type")).and_then(Value::as_str))
        .unwrap_or("room")
        .to_string();
    let area_m2 = value.get("dimensions").and_then(|d| d.get("area_m2")).and_then(Value::as_f64);

    generate_room_with(&RoomRequest { room_type, area_m2 }, confidence, requires_human_review)
}

fn shape_validation(value: &Value, confidence: f64, requires_human_review: bool) -> ValidationArtifact {
    let is_compliant = value.get("is_valid").and_then(Value::as_bool).unwrap_or(true);
    let violations = value
        .get("errors")
        .and_then(Value::as_array)
        .map(|errors| errors.iter().filter_map(|e| e.as_str().map(str::to_string)).collect())
        .unwrap_or_default();

    ValidationArtifact { is_compliant, violations, confidence, requires_human_review }
}

/// Non-structural detail (furniture/lighting/materials) to merge alongside a
/// `room` artifact when the provider didn't supply its own — kept separate
/// from [`shape_success`] since `AICommandResult::artifact` only carries one
/// typed variant; callers attach this to `context`/logs, not the artifact.
#[must_use]
pub fn room_detail_fallback(room_type: &str) -> Value {
    generate_room_detail(room_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loose_layout_json_is_synthesized_into_full_geometry() {
        let value = json!({
            "walls": [], "doors": [], "windows": [],
            "rooms": [{"name": "Bedroom", "area": 12.0}, {"name": "Bathroom", "area": 5.0}],
            "confidence": 0.9
        });
        let artifact = shape_layout(&value, 0.9, false);
        // Bedroom + Bathroom, plus the corridor the layout generator always
        // appends to connect them (spec §4.7 step 6).
        assert_eq!(artifact.rooms.len(), 3);
        assert!(!artifact.walls.is_empty());
        assert!((artifact.confidence - 0.9).abs() < f64::EPSILON);
        assert!(!artifact.requires_human_review);
    }

    #[test]
    fn loose_validation_json_maps_directly() {
        let value = json!({
            "is_valid": false, "compliance_score": 0.4,
            "errors": ["room too small"], "warnings": []
        });
        let artifact = shape_validation(&value, 0.4, true);
        assert!(!artifact.is_compliant);
        assert_eq!(artifact.violations, vec!["room too small".to_string()]);
    }
}
