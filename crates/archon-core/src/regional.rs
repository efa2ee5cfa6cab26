//! ABOUTME: Regional building-code minimums shared by the validator and fallback generator
//! ABOUTME: Magnitudes are ported from the original service's per-region defaults, not invented

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A region's minimum-compliance table: room size floors, setbacks, and the
/// accessibility clear width the validator warns below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionalCodes {
    pub region: &'static str,
    pub primary_codes: Vec<&'static str>,
    /// Minimum room area in m² by room type.
    pub min_room_sizes_m2: HashMap<&'static str, f64>,
    /// Setback requirements in meters (front/side/rear).
    pub setbacks_m: HashMap<&'static str, f64>,
    /// Minimum accessible clear width in millimeters (spec §4.6).
    pub accessible_width_mm: i64,
}

impl RegionalCodes {
    #[must_use]
    pub fn min_room_size(&self, room_type: &str) -> f64 {
        self.min_room_sizes_m2.get(room_type).copied().unwrap_or(DEFAULT_MIN_ROOM_SIZE_M2)
    }
}

/// Fallback minimum when a region has no entry for a given room type.
pub const DEFAULT_MIN_ROOM_SIZE_M2: f64 = 6.0;

fn table(pairs: &[(&'static str, f64)]) -> HashMap<&'static str, f64> {
    pairs.iter().copied().collect()
}

/// Regional code table, grounded on the original's `localization.py`
/// `_create_default_building_codes` defaults. Only the fields the validator
/// and fallback generator consume are kept (spec §4.6/§4.7); occupancy
/// ratios, climate adaptations, and energy/accessibility standard labels
/// are out of scope for the core.
#[must_use]
pub fn codes_for_region(region: &str) -> RegionalCodes {
    match region.to_ascii_uppercase().as_str() {
        "EU" | "EUROPE" => RegionalCodes {
            region: "europe",
            primary_codes: vec!["Eurocode", "National Building Regulations"],
            min_room_sizes_m2: table(&[("bedroom", 9.0), ("living_room", 16.0), ("kitchen", 6.0)]),
            setbacks_m: table(&[("front", 5.0), ("side", 3.0), ("rear", 5.0)]),
            accessible_width_mm: 900,
        },
        "ME" | "MIDDLE_EAST" => RegionalCodes {
            region: "middle_east",
            primary_codes: vec!["National Building Code", "Municipal Regulations"],
            min_room_sizes_m2: table(&[("bedroom", 9.0), ("living_room", 12.0), ("kitchen", 6.0)]),
            setbacks_m: table(&[("front", 6.0), ("side", 3.0), ("rear", 6.0)]),
            accessible_width_mm: 900,
        },
        "APAC" | "ASIA_PACIFIC" => RegionalCodes {
            region: "asia_pacific",
            primary_codes: vec!["National Building Code", "Local Regulations"],
            min_room_sizes_m2: table(&[("bedroom", 8.0), ("living_room", 14.0), ("kitchen", 5.0)]),
            setbacks_m: table(&[("front", 4.0), ("side", 2.0), ("rear", 4.0)]),
            accessible_width_mm: 900,
        },
        "AF" | "AFRICA" => RegionalCodes {
            region: "africa",
            primary_codes: vec!["National Building Code"],
            min_room_sizes_m2: table(&[("bedroom", 7.0), ("living_room", 12.0), ("kitchen", 5.0)]),
            setbacks_m: table(&[("front", 5.0), ("side", 2.5), ("rear", 5.0)]),
            accessible_width_mm: 900,
        },
        "SA" | "SOUTH_AMERICA" => RegionalCodes {
            region: "south_america",
            primary_codes: vec!["National Building Code", "Regional Standards"],
            min_room_sizes_m2: table(&[("bedroom", 8.0), ("living_room", 15.0), ("kitchen", 6.0)]),
            setbacks_m: table(&[("front", 6.0), ("side", 3.0), ("rear", 6.0)]),
            accessible_width_mm: 900,
        },
        "TR" => RegionalCodes {
            region: "turkey",
            primary_codes: vec!["Türkiye Bina Deprem Yönetmeliği", "İmar Yönetmeliği"],
            min_room_sizes_m2: table(&[("bedroom", 9.0), ("living_room", 16.0), ("kitchen", 6.0)]),
            setbacks_m: table(&[("front", 5.0), ("side", 3.0), ("rear", 5.0)]),
            accessible_width_mm: 900,
        },
        // "US" / "NA" / "NORTH_AMERICA" and anything unrecognized: fall back
        // to the North American table rather than erroring, since an
        // unrecognized region should degrade gracefully (consistent with
        // the locale resolver's default-to-US behavior in `archon-prompt`).
        _ => RegionalCodes {
            region: "north_america",
            primary_codes: vec!["IBC", "IRC", "Local Zoning"],
            min_room_sizes_m2: table(&[("bedroom", 6.5), ("living_room", 13.9), ("kitchen", 7.4)]),
            setbacks_m: table(&[("front", 7.6), ("side", 3.0), ("rear", 7.6)]),
            accessible_width_mm: 900,
        },
    }
}
