//! ABOUTME: Standard dimension/material/opening tables the fallback generator draws from
//! ABOUTME: Magnitudes are ported from the original rule-based service, restated as Rust consts

use archon_core::types::artifact::{DoorType, WallType, WindowType};

/// `(width_m, length_m)` size bands for a room type at small/standard/large area.
#[derive(Debug, Clone, Copy)]
pub struct RoomSizeBand {
    pub min: (f64, f64),
    pub standard: (f64, f64),
    pub large: (f64, f64),
}

/// Standard room footprint bands by type, ported from
/// `ArchitecturalFallbackService.standard_room_dimensions`.
#[must_use]
pub fn room_size_band(room_type: &str) -> RoomSizeBand {
    match room_type {
        "living_room" => RoomSizeBand { min: (3.5, 4.0), standard: (4.5, 5.5), large: (6.0, 7.0) },
        "kitchen" => RoomSizeBand { min: (2.5, 3.0), standard: (3.0, 4.0), large: (3.5, 5.0) },
        "bathroom" => RoomSizeBand { min: (1.8, 2.0), standard: (2.2, 2.5), large: (2.5, 3.0) },
        "dining_room" => RoomSizeBand { min: (3.0, 3.5), standard: (3.5, 4.5), large: (4.0, 5.5) },
        "office" => RoomSizeBand { min: (2.5, 3.0), standard: (3.0, 3.5), large: (3.5, 4.5) },
        "corridor" => RoomSizeBand { min: (1.2, 3.0), standard: (1.5, 5.0), large: (2.0, 8.0) },
        "storage" => RoomSizeBand { min: (1.5, 2.0), standard: (2.0, 2.5), large: (2.5, 3.0) },
        // "bedroom" and any unrecognized type default to the bedroom band.
        _ => RoomSizeBand { min: (3.0, 3.0), standard: (3.5, 4.0), large: (4.0, 5.0) },
    }
}

/// Wall construction spec: thickness in mm, plus the tagged type the
/// structured artifact carries.
#[derive(Debug, Clone, Copy)]
pub struct WallSpec {
    pub thickness_mm: i64,
    pub wall_type: WallType,
}

pub const EXTERIOR_WALL: WallSpec = WallSpec { thickness_mm: 300, wall_type: WallType::Exterior };
pub const LOAD_BEARING_WALL: WallSpec = WallSpec { thickness_mm: 200, wall_type: WallType::InteriorLoadBearing };
pub const PARTITION_WALL: WallSpec = WallSpec { thickness_mm: 100, wall_type: WallType::InteriorPartition };
pub const BATHROOM_WALL: WallSpec = WallSpec { thickness_mm: 150, wall_type: WallType::Bathroom };

/// Interior wall spec for a room type: bathrooms get masonry, everything
/// else a standard partition (spec §4.7 step 4).
#[must_use]
pub const fn interior_wall_for(room_type: &str) -> WallSpec {
    match room_type.as_bytes() {
        b"bathroom" => BATHROOM_WALL,
        _ => PARTITION_WALL,
    }
}

pub const STANDARD_CEILING_HEIGHT_MM: i64 = 2700;

#[derive(Debug, Clone, Copy)]
pub struct OpeningSize {
    pub width_mm: i64,
    pub height_mm: i64,
}

pub const DOOR_SINGLE: OpeningSize = OpeningSize { width_mm: 900, height_mm: 2100 };
pub const DOOR_DOUBLE: OpeningSize = OpeningSize { width_mm: 1800, height_mm: 2100 };
pub const DOOR_ACCESSIBLE: OpeningSize = OpeningSize { width_mm: 950, height_mm: 2100 };

pub const WINDOW_STANDARD: OpeningSize = OpeningSize { width_mm: 1200, height_mm: 1200 };
pub const WINDOW_LARGE: OpeningSize = OpeningSize { width_mm: 1800, height_mm: 1500 };
pub const WINDOW_FLOOR_TO_CEILING: OpeningSize = OpeningSize { width_mm: 2400, height_mm: 2400 };

#[must_use]
pub const fn door_type_for(room_type: &str) -> (OpeningSize, DoorType) {
    match room_type.as_bytes() {
        b"living_room" => (DOOR_DOUBLE, DoorType::Double),
        _ => (DOOR_SINGLE, DoorType::Single),
    }
}

#[must_use]
pub const fn window_type_for(room_type: &str) -> (OpeningSize, WindowType) {
    match room_type.as_bytes() {
        b"living_room" => (WINDOW_LARGE, WindowType::Large),
        _ => (WINDOW_STANDARD, WindowType::Standard),
    }
}

/// Default room program when the request supplies no room list (spec §4.7
/// step 1): fractions of `total_area_m2` by room type.
pub const DEFAULT_ROOM_PROGRAM: &[(&str, f64)] = &[
    ("living_room", 0.35),
    ("bedroom", 0.25),
    ("kitchen", 0.15),
    ("bathroom", 0.10),
    ("corridor", 0.15),
];

/// Typical furniture placements for standard room types, ported from
/// `_generate_standard_furniture`.
#[must_use]
pub fn standard_furniture(room_type: &str) -> Vec<(&'static str, &'static str)> {
    match room_type {
        "bedroom" => vec![("bed", "queen"), ("nightstand", "standard"), ("wardrobe", "large")],
        "living_room" => vec![("sofa", "three_seat"), ("coffee_table", "standard"), ("tv_unit", "standard")],
        "kitchen" => vec![("counter", "standard"), ("sink", "standard"), ("refrigerator", "standard")],
        "bathroom" => vec![("toilet", "standard"), ("sink", "standard"), ("shower", "standard")],
        "dining_room" => vec![("dining_table", "standard"), ("chairs", "set_of_6")],
        "office" => vec![("desk", "standard"), ("chair", "standard"), ("bookshelf", "standard")],
        _ => Vec::new(),
    }
}

#[must_use]
pub fn standard_materials(room_type: &str) -> Vec<&'static str> {
    match room_type {
        "bathroom" => vec!["tile_floor", "tile_wall", "waterproof_paint"],
        "kitchen" => vec!["tile_floor", "laminate_counter", "painted_wall"],
        _ => vec!["laminate_floor", "painted_wall"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bathroom_gets_masonry_wall() {
        assert_eq!(interior_wall_for("bathroom").wall_type, WallType::Bathroom);
    }

    #[test]
    fn unrecognized_room_type_falls_back_to_bedroom_band() {
        let band = room_size_band("sunroom");
        assert_eq!(band.min, (3.0, 3.0));
    }

    #[test]
    fn default_room_program_sums_to_one() {
        let sum: f64 = DEFAULT_ROOM_PROGRAM.iter().map(|(_, frac)| frac).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
