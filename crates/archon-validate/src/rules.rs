//! ABOUTME: Stage 3 (domain rules): layout/room/validate semantics beyond shape
//! ABOUTME: Errors block the result (coordinator falls back); warnings are advisory

use archon_core::regional::RegionalCodes;
use archon_core::types::command::TaskType;
use serde_json::Value;
use std::collections::HashSet;

/// Accumulated errors/warnings from stage 3. `errors` non-empty means the
/// coordinator must reject this output and attempt fallback (spec §4.6).
#[derive(Debug, Default)]
pub struct RuleOutcome {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl RuleOutcome {
    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Run the domain rules for `task` against the schema-valid `value`,
/// consuming `codes` for the regional minimums (layout/room only) and
/// `requested_room_count` (layout only, `None` when the request didn't pin
/// a count).
#[must_use]
pub fn check_domain_rules(task: TaskType, value: &Value, codes: &RegionalCodes, requested_room_count: Option<usize>) -> RuleOutcome {
    let mut outcome = RuleOutcome::default();

    check_confidence(value, &mut outcome);

    match task {
        TaskType::Layout => check_layout(value, codes, requested_room_count, &mut outcome),
        TaskType::Room => check_room(value, codes, &mut outcome),
        TaskType::Validate => check_validate(value, &mut outcome),
        TaskType::Analyze | TaskType::Custom => {}
    }

    outcome
}

fn check_confidence(value: &Value, outcome: &mut RuleOutcome) {
    let Some(confidence) = value.get("confidence").and_then(Value::as_f64) else {
        return;
    };
    if !(0.0..=1.0).contains(&confidence) {
        outcome.error(format!("confidence {confidence} is outside [0,1]"));
    }
}

fn check_layout(value: &Value, codes: &RegionalCodes, requested_room_count: Option<usize>, outcome: &mut RuleOutcome) {
    let rooms = value.get("rooms").and_then(Value::as_array).cloned().unwrap_or_default();
    let walls = value.get("walls").and_then(Value::as_array).cloned().unwrap_or_default();

    if let Some(requested) = requested_room_count {
        let actual = rooms.len();
        let delta = actual.abs_diff(requested);
        if delta > 1 {
            outcome.error(format!("room count {actual} does not match requested {requested} (±1)"));
        }
    }

    let wall_ids: HashSet<String> = walls
        .iter()
        .filter_map(|w| w.get("id").and_then(Value::as_str).map(str::to_string))
        .collect();

    for wall in &walls {
        let start = wall.get("start");
        let end = wall.get("end");
        if start.is_some() && start == end {
            let id = wall.get("id").and_then(Value::as_str).unwrap_or("?");
            outcome.error(format!("wall {id} has identical start and end points"));
        }
    }

    for (kind, key) in [("door", "doors"), ("window", "windows")] {
        for opening in value.get(key).and_then(Value::as_array).into_iter().flatten() {
            let Some(wall_id) = opening.get("wall_id").and_then(Value::as_str) else {
                continue;
            };
            if !wall_ids.contains(wall_id) {
                outcome.error(format!("{kind} references unknown wall_id {wall_id}"));
            }
        }
    }

    for room in &rooms {
        let area = room.get("area").or_else(|| room.get("area_m2")).and_then(Value::as_f64);
        match area {
            Some(area) if area < 0.0 => outcome.error("room area must be non-negative".to_string()),
            Some(area) => {
                let room_type = room.get("type").and_then(Value::as_str).unwrap_or("room");
                let minimum = codes.min_room_size(room_type);
                if area < minimum {
                    let name = room.get("name").and_then(Value::as_str).unwrap_or(room_type);
                    outcome.warn(format!("room '{name}' area {area:.1}m² is below the {} regional minimum of {minimum:.1}m²", codes.region));
                }
            }
            None => {}
        }
    }

    check_accessible_widths(value, codes, outcome);
}

fn check_room(value: &Value, codes: &RegionalCodes, outcome: &mut RuleOutcome) {
    if let Some(area) = value.get("dimensions").and_then(|d| d.get("area_m2")).and_then(Value::as_f64) {
        if area < 0.0 {
            outcome.error("room area must be non-negative".to_string());
        } else if area < codes.min_room_size("bedroom") {
            outcome.warn(format!("room area {area:.1}m² is below the {} regional minimum", codes.region));
        }
    }
}

fn check_validate(value: &Value, outcome: &mut RuleOutcome) {
    if let Some(score) = value.get("compliance_score").and_then(Value::as_f64) {
        if !(0.0..=1.0).contains(&score) {
            outcome.error(format!("compliance_score {score} is outside [0,1]"));
        }
    }
}

/// Clear widths below `codes.accessible_width_mm` (spec default 900mm)
/// produce warnings, never errors — accessibility is advisory at the
/// validator layer (spec §4.6).
fn check_accessible_widths(value: &Value, codes: &RegionalCodes, outcome: &mut RuleOutcome) {
    for door in value.get("doors").and_then(Value::as_array).into_iter().flatten() {
        let Some(width) = door.get("width_mm").and_then(Value::as_i64) else {
            continue;
        };
        if width < codes.accessible_width_mm {
            let id = door.get("id").and_then(Value::as_str).unwrap_or("?");
            outcome.warn(format!("door {id} clear width {width}mm is below the accessible minimum of {}mm", codes.accessible_width_mm));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archon_core::codes_for_region;
    use serde_json::json;

    #[test]
    fn negative_area_is_an_error() {
        let value = json!({
            "confidence": 0.8,
            "rooms": [{"name": "r1", "type": "bedroom", "area": -5.0}],
            "walls": [], "doors": [], "windows": []
        });
        let outcome = check_domain_rules(TaskType::Layout, &value, &codes_for_region("US"), None);
        assert!(!outcome.errors.is_empty());
    }

    #[test]
    fn below_minimum_area_is_a_warning_not_an_error() {
        let value = json!({
            "confidence": 0.8,
            "rooms": [{"name": "tiny", "type": "bedroom", "area": 2.0}],
            "walls": [], "doors": [], "windows": []
        });
        let outcome = check_domain_rules(TaskType::Layout, &value, &codes_for_region("US"), None);
        assert!(outcome.errors.is_empty());
        assert!(outcome.warnings.iter().any(|w| w.contains("regional minimum")));
    }

    #[test]
    fn door_referencing_unknown_wall_is_an_error() {
        let value = json!({
            "confidence": 0.8,
            "rooms": [], "walls": [{"id": "wall_1", "start": {"x":0}, "end": {"x":1}}],
            "doors": [{"id": "door_1", "wall_id": "wall_missing"}], "windows": []
        });
        let outcome = check_domain_rules(TaskType::Layout, &value, &codes_for_region("US"), None);
        assert!(outcome.errors.iter().any(|e| e.contains("unknown wall_id")));
    }

    #[test]
    fn room_count_within_one_of_requested_is_accepted() {
        let value = json!({
            "confidence": 0.8,
            "rooms": [{"name": "a", "area": 10.0}, {"name": "b", "area": 10.0}],
            "walls": [], "doors": [], "windows": []
        });
        let outcome = check_domain_rules(TaskType::Layout, &value, &codes_for_region("US"), Some(3));
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn room_count_off_by_more_than_one_is_an_error() {
        let value = json!({
            "confidence": 0.8,
            "rooms": [{"name": "a", "area": 10.0}],
            "walls": [], "doors": [], "windows": []
        });
        let outcome = check_domain_rules(TaskType::Layout, &value, &codes_for_region("US"), Some(5));
        assert!(!outcome.errors.is_empty());
    }

    #[test]
    fn narrow_door_warns_but_does_not_error() {
        let value = json!({
            "confidence": 0.8,
            "rooms": [], "walls": [{"id": "wall_1", "start": {"x":0}, "end": {"x":1}}],
            "doors": [{"id": "door_1", "wall_id": "wall_1", "width_mm": 700}], "windows": []
        });
        let outcome = check_domain_rules(TaskType::Layout, &value, &codes_for_region("US"), None);
        assert!(outcome.errors.is_empty());
        assert!(outcome.warnings.iter().any(|w| w.contains("accessible minimum")));
    }
}
