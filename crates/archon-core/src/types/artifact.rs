//! ABOUTME: Structured artifacts produced by the orchestrator and fallback generator
//! ABOUTME: Coordinates are integer millimeters; right-handed XY plane with Z up

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Point2Mm {
    pub x_mm: i64,
    pub y_mm: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Point3Mm {
    pub x_mm: i64,
    pub y_mm: i64,
    pub z_mm: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DimensionsMm {
    pub width_mm: i64,
    pub length_mm: i64,
    pub height_mm: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub area_m2: f64,
    pub dimensions: DimensionsMm,
    pub position: Point2Mm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallType {
    Exterior,
    InteriorLoadBearing,
    InteriorPartition,
    Bathroom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub id: String,
    pub start: Point3Mm,
    pub end: Point3Mm,
    pub thickness_mm: i64,
    pub height_mm: i64,
    #[serde(rename = "type")]
    pub wall_type: WallType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorType {
    Single,
    Double,
    Accessible,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Door {
    pub id: String,
    pub wall_id: String,
    pub position_mm: i64,
    pub width_mm: i64,
    pub height_mm: i64,
    #[serde(rename = "type")]
    pub door_type: DoorType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowType {
    Standard,
    Large,
    FloorToCeiling,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Window {
    pub id: String,
    pub wall_id: String,
    pub position_mm: i64,
    pub width_mm: i64,
    pub height_mm: i64,
    #[serde(rename = "type")]
    pub window_type: WindowType,
}

/// Structured output of a `layout` task, produced either by the provider
/// dispatcher (after validation) or by the deterministic fallback generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutArtifact {
    pub rooms: Vec<Room>,
    pub walls: Vec<Wall>,
    pub doors: Vec<Door>,
    pub windows: Vec<Window>,
    pub confidence: f64,
    pub requires_human_review: bool,
}

/// Structured output of a `room` task: a single room plus its supporting walls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomArtifact {
    pub room: Room,
    pub walls: Vec<Wall>,
    pub confidence: f64,
    pub requires_human_review: bool,
}

/// Structured output of a `validate` task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationArtifact {
    pub is_compliant: bool,
    pub violations: Vec<String>,
    pub confidence: f64,
    pub requires_human_review: bool,
}

/// Task-specific structured object carried by `AICommandResult::artifact`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "artifact_type", rename_all = "snake_case")]
pub enum Artifact {
    Layout(LayoutArtifact),
    Room(RoomArtifact),
    Validation(ValidationArtifact),
    /// `analyze`/`custom` tasks return free-form JSON; schema validation for
    /// these is limited to the generic structural checks in `archon-validate`.
    Generic(serde_json::Value),
}

impl Artifact {
    #[must_use]
    pub fn confidence(&self) -> f64 {
        match self {
            Self::Layout(a) => a.confidence,
            Self::Room(a) => a.confidence,
            Self::Validation(a) => a.confidence,
            Self::Generic(_) => 1.0,
        }
    }

    #[must_use]
    pub fn requires_human_review(&self) -> bool {
        match self {
            Self::Layout(a) => a.requires_human_review,
            Self::Room(a) => a.requires_human_review,
            Self::Validation(a) => a.requires_human_review,
            Self::Generic(_) => false,
        }
    }
}
