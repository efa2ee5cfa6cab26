//! ABOUTME: Deterministic single-room generator (C7), mirrors `layout` at
//! ABOUTME: the scale of one room plus its supporting walls

use crate::catalog::{door_type_for, room_size_band, standard_furniture, standard_materials, window_type_for, EXTERIOR_WALL, STANDARD_CEILING_HEIGHT_MM};
use crate::layout::FALLBACK_CONFIDENCE;
use archon_core::types::artifact::{DimensionsMm, Door, Point2Mm, Point3Mm, Room, RoomArtifact, Wall, Window};
use serde_json::{json, Value};

/// Inputs for a single-room request.
#[derive(Debug, Clone)]
pub struct RoomRequest {
    pub room_type: String,
    /// Requested floor area; falls back to the room type's standard band
    /// when absent.
    pub area_m2: Option<f64>,
}

/// Generate one room sized from the standard catalog band, with its four
/// enclosing walls, one door, and (outside bathrooms/corridors) one window.
#[must_use]
pub fn generate_room(request: &RoomRequest) -> RoomArtifact {
    generate_room_with(request, FALLBACK_CONFIDENCE, true)
}

/// Same sizing/enclosure algorithm as [`generate_room`], with caller-supplied
/// confidence/review flags — used by the coordinator to synthesize wall
/// geometry around an AI-provided room dimension that omitted it.
#[must_use]
pub fn generate_room_with(request: &RoomRequest, confidence: f64, requires_human_review: bool) -> RoomArtifact {
    let band = room_size_band(&request.room_type);
    let (width_m, length_m) = request.area_m2.map_or(band.standard, |area| {
        let width = band.standard.0;
        (width, area / width)
    });

    let width_mm = (width_m * 1000.0).round() as i64;
    let length_mm = (length_m * 1000.0).round() as i64;

    let room = Room {
        id: "room_0".to_string(),
        name: format!("{}_1", request.room_type),
        room_type: request.room_type.clone(),
        area_m2: width_m * length_m,
        dimensions: DimensionsMm { width_mm, length_mm, height_mm: STANDARD_CEILING_HEIGHT_MM },
        position: Point2Mm { x_mm: 0, y_mm: 0 },
    };

    let corners = [(0, 0), (width_mm, 0), (width_mm, length_mm), (0, length_mm)];
    let mut walls = Vec::with_capacity(4);
    for index in 0..4 {
        let start = corners[index];
        let end = corners[(index + 1) % 4];
        walls.push(Wall {
            id: format!("wall_{index}"),
            start: Point3Mm { x_mm: start.0, y_mm: start.1, z_mm: 0 },
            end: Point3Mm { x_mm: end.0, y_mm: end.1, z_mm: 0 },
            thickness_mm: EXTERIOR_WALL.thickness_mm,
            height_mm: STANDARD_CEILING_HEIGHT_MM,
            wall_type: EXTERIOR_WALL.wall_type,
        });
    }

    RoomArtifact {
        room,
        walls,
        confidence,
        requires_human_review,
    }
}

/// Non-structural room detail (furniture/lighting/materials) that the
/// orchestrator folds into `Artifact::Generic` alongside the structured
/// [`RoomArtifact`] — the original service keeps these as free-form fields
/// rather than typed geometry.
#[must_use]
pub fn generate_room_detail(room_type: &str) -> Value {
    let furniture = standard_furniture(room_type);
    json!({
        "furniture": furniture.iter().map(|(item, variant)| json!({"item": item, "variant": variant})).collect::<Vec<_>>(),
        "lighting": ["ceiling_fixture", "ambient"],
        "materials": standard_materials(room_type),
    })
}

/// Doors and windows to pair with [`generate_room`]'s walls, split out
/// because the structured `RoomArtifact` has no door/window fields of its
/// own (spec §6 keeps those on `layout`, not `room`).
#[must_use]
pub fn generate_room_openings(request: &RoomRequest, walls: &[Wall]) -> (Vec<Door>, Vec<Window>) {
    let Some(first_wall) = walls.first() else {
        return (Vec::new(), Vec::new());
    };
    let (door_size, door_type) = door_type_for(&request.room_type);
    let doors = vec![Door {
        id: "door_0".to_string(),
        wall_id: first_wall.id.clone(),
        position_mm: first_wall.start.x_mm.abs_diff(first_wall.end.x_mm) as i64 / 2,
        width_mm: door_size.width_mm,
        height_mm: door_size.height_mm,
        door_type,
    }];

    if request.room_type == "bathroom" || request.room_type == "corridor" {
        return (doors, Vec::new());
    }

    let window_wall = walls.get(1).unwrap_or(first_wall);
    let (window_size, window_type) = window_type_for(&request.room_type);
    let windows = vec![Window {
        id: "window_0".to_string(),
        wall_id: window_wall.id.clone(),
        position_mm: window_wall.start.y_mm.abs_diff(window_wall.end.y_mm) as i64 / 2,
        width_mm: window_size.width_mm,
        height_mm: window_size.height_mm,
        window_type,
    }];

    (doors, windows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_room_has_four_walls() {
        let artifact = generate_room(&RoomRequest { room_type: "bedroom".to_string(), area_m2: None });
        assert_eq!(artifact.walls.len(), 4);
    }

    #[test]
    fn explicit_area_is_respected() {
        let artifact = generate_room(&RoomRequest { room_type: "bedroom".to_string(), area_m2: Some(20.0) });
        assert!((artifact.room.area_m2 - 20.0).abs() < 0.5);
    }

    #[test]
    fn bathroom_gets_no_window() {
        let request = RoomRequest { room_type: "bathroom".to_string(), area_m2: None };
        let artifact = generate_room(&request);
        let (_, windows) = generate_room_openings(&request, &artifact.walls);
        assert!(windows.is_empty());
    }

    #[test]
    fn room_detail_carries_furniture_for_known_type() {
        let detail = generate_room_detail("bedroom");
        assert!(detail["furniture"].as_array().is_some_and(|f| !f.is_empty()));
    }
}
