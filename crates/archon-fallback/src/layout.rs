//! ABOUTME: Deterministic grid-based layout generator (C7), used when the AI
//! ABOUTME: provider path is unavailable or its output fails validation

use crate::catalog::{
    door_type_for, interior_wall_for, room_size_band, window_type_for, DEFAULT_ROOM_PROGRAM,
    EXTERIOR_WALL, STANDARD_CEILING_HEIGHT_MM,
};
use archon_core::types::artifact::{
    DimensionsMm, Door, LayoutArtifact, Point2Mm, Point3Mm, Room, Wall, Window,
};

/// The confidence the fallback generator reports for every artifact it
/// produces. Deliberately below the default review threshold (spec §4.7):
/// fallback output is always flagged `requires_human_review`.
pub const FALLBACK_CONFIDENCE: f64 = 0.65;

/// Inputs the deterministic generator needs; the coordinator assembles this
/// from the original `AICommand` and any structured context it carries.
#[derive(Debug, Clone)]
pub struct LayoutRequest {
    pub total_area_m2: f64,
    /// Explicit room program, e.g. `[("bedroom", 2), ("bathroom", 1)]`. When
    /// empty, the default program (spec §4.7 step 1) is used.
    pub rooms: Vec<(String, u32)>,
}

impl LayoutRequest {
    /// The room program to lay out, always including exactly one
    /// `corridor` entry (spec §4.7 step 6: "emit a single accessible
    /// corridor connecting all rooms"). The default program already names
    /// one; an explicit program that omits it gets one appended so the
    /// connector is never skipped.
    fn room_program(&self) -> Vec<(String, f64)> {
        if self.rooms.is_empty() {
            return DEFAULT_ROOM_PROGRAM.iter().map(|(name, frac)| ((*name).to_string(), *frac)).collect();
        }

        let mut rooms = self.rooms.clone();
        if !rooms.iter().any(|(name, _)| name.eq_ignore_ascii_case("corridor")) {
            rooms.push(("corridor".to_string(), 1));
        }

        let total_count: u32 = rooms.iter().map(|(_, n)| n).sum();
        let total_count = total_count.max(1) as f64;
        rooms
            .into_iter()
            .flat_map(|(name, count)| std::iter::repeat(name.clone()).take(count as usize))
            .map(|name| (name, 1.0 / total_count))
            .collect()
    }
}

/// Grid layout: rooms tiled in a roughly-square grid scaled to a 1.4:1
/// envelope aspect ratio, with exterior walls on the perimeter and a single
/// partition wall between adjacent cells (spec §4.7 steps 2-5).
#[must_use]
pub fn generate_layout(request: &LayoutRequest) -> LayoutArtifact {
    generate_layout_with(request, FALLBACK_CONFIDENCE, true)
}

/// Same grid algorithm as [`generate_layout`], but with caller-supplied
/// confidence/review flags. The orchestration coordinator reaches for this
/// when a provider's JSON passes stage-2 schema validation (it names a
/// `rooms` program) but omits full wall/door/window geometry, so the
/// missing structure is synthesized from the AI's own room list rather than
/// the deterministic default program — the result is not a fallback, so it
/// does not carry [`FALLBACK_CONFIDENCE`].
#[must_use]
pub fn generate_layout_with(request: &LayoutRequest, confidence: f64, requires_human_review: bool) -> LayoutArtifact {
    let program = request.room_program();
    let room_count = program.len().max(1);

    let grid_cols = (room_count as f64).sqrt().ceil() as usize;
    let grid_cols = grid_cols.max(1);
    let grid_rows = room_count.div_ceil(grid_cols);

    let envelope_width_m = (request.total_area_m2 * 1.4).sqrt();
    let envelope_length_m = if envelope_width_m > 0.0 { request.total_area_m2 / envelope_width_m } else { 0.0 };

    let cell_width_m = envelope_width_m / grid_cols as f64;
    let cell_length_m = envelope_length_m / grid_rows as f64;

    let mut rooms = Vec::with_capacity(room_count);
    let mut walls = Vec::new();
    let mut doors = Vec::new();
    let mut windows = Vec::new();

    perimeter_walls(envelope_width_m, envelope_length_m, &mut walls);

    for (index, (room_type, _fraction)) in program.iter().enumerate() {
        let col = index % grid_cols;
        let row = index / grid_cols;

        let band = room_size_band(room_type);
        let width_m = cell_width_m.max(band.min.0);
        let length_m = cell_length_m.max(band.min.1);

        let x_mm = (col as f64 * cell_width_m * 1000.0).round() as i64;
        let y_mm = (row as f64 * cell_length_m * 1000.0).round() as i64;
        let width_mm = (width_m * 1000.0).round() as i64;
        let length_mm = (length_m * 1000.0).round() as i64;

        let room_id = format!("room_{index}");

        rooms.push(Room {
            id: room_id.clone(),
            name: format!("{room_type}_{}", index + 1),
            room_type: room_type.clone(),
            area_m2: width_m * length_m,
            dimensions: DimensionsMm { width_mm, length_mm, height_mm: STANDARD_CEILING_HEIGHT_MM },
            position: Point2Mm { x_mm, y_mm },
        });

        let wall_spec = interior_wall_for(room_type);
        let wall_id = format!("wall_interior_{index}");
        walls.push(Wall {
            id: wall_id.clone(),
            start: Point3Mm { x_mm, y_mm, z_mm: 0 },
            end: Point3Mm { x_mm: x_mm + width_mm, y_mm, z_mm: 0 },
            thickness_mm: wall_spec.thickness_mm,
            height_mm: STANDARD_CEILING_HEIGHT_MM,
            wall_type: wall_spec.wall_type,
        });

        let (door_size, door_type) = door_type_for(room_type);
        doors.push(Door {
            id: format!("door_{index}"),
            wall_id: wall_id.clone(),
            position_mm: width_mm / 2,
            width_mm: door_size.width_mm,
            height_mm: door_size.height_mm,
            door_type,
        });

        if room_type != "corridor" && room_type != "bathroom" {
            let (window_size, window_type) = window_type_for(room_type);
            windows.push(Window {
                id: format!("window_{index}"),
                wall_id,
                position_mm: width_mm / 2,
                width_mm: window_size.width_mm,
                height_mm: window_size.height_mm,
                window_type,
            });
        }
    }

    LayoutArtifact {
        rooms,
        walls,
        doors,
        windows,
        confidence,
        requires_human_review,
    }
}

fn perimeter_walls(width_m: f64, length_m: f64, walls: &mut Vec<Wall>) {
    let width_mm = (width_m * 1000.0).round() as i64;
    let length_mm = (length_m * 1000.0).round() as i64;
    let corners = [
        (0, 0),
        (width_mm, 0),
        (width_mm, length_mm),
        (0, length_mm),
    ];
    for (index, window) in corners.windows(2).enumerate() {
        push_perimeter_wall(walls, index, window[0], window[1]);
    }
    push_perimeter_wall(walls, corners.len() - 1, corners[corners.len() - 1], corners[0]);
}

fn push_perimeter_wall(walls: &mut Vec<Wall>, index: usize, start: (i64, i64), end: (i64, i64)) {
    walls.push(Wall {
        id: format!("wall_exterior_{index}"),
        start: Point3Mm { x_mm: start.0, y_mm: start.1, z_mm: 0 },
        end: Point3Mm { x_mm: end.0, y_mm: end.1, z_mm: 0 },
        thickness_mm: EXTERIOR_WALL.thickness_mm,
        height_mm: STANDARD_CEILING_HEIGHT_MM,
        wall_type: EXTERIOR_WALL.wall_type,
    });
}
