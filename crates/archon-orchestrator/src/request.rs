//! ABOUTME: Builds the deterministic-fallback request shape from an `AICommand`'s loose context
//! ABOUTME: Shared by the coordinator's step 9 and its own tests

use archon_core::types::command::AICommand;
use archon_fallback::layout::LayoutRequest;
use archon_fallback::room::RoomRequest;
use archon_fallback::{ComplianceInput, FallbackRequest};
use serde_json::Value;

/// Extract whatever structured room program the caller supplied under
/// `context.rooms`, falling back to an empty program (the default template
/// in `archon-fallback::layout`) when absent or malformed.
fn room_program(context: &std::collections::HashMap<String, Value>) -> Vec<(String, u32)> {
    context
        .get("rooms")
        .and_then(Value::as_array)
        .map(|rooms| {
            rooms
                .iter()
                .filter_map(|room| {
                    let room_type = room.get("type").and_then(Value::as_str)?;
                    let count = room.get("count").and_then(Value::as_u64).unwrap_or(1) as u32;
                    Some((room_type.to_string(), count))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Build the [`FallbackRequest`] the deterministic generator needs for
/// `cmd`, reading whatever the caller put in `context` (spec §6's loose
/// `/ai/commands` body) and degrading to sensible defaults otherwise.
#[must_use]
pub fn fallback_request_for(cmd: &AICommand) -> FallbackRequest {
    match cmd.task_type {
        archon_core::types::command::TaskType::Layout => FallbackRequest::Layout(LayoutRequest {
            total_area_m2: cmd.context.get("total_area_m2").and_then(Value::as_f64).unwrap_or(80.0),
            rooms: room_program(&cmd.context),
        }),
        archon_core::types::command::TaskType::Room => FallbackRequest::Room(RoomRequest {
            room_type: cmd.context.get("room_type").and_then(Value::as_str).unwrap_or("room").to_string(),
            area_m2: cmd.context.get("area_m2").and_then(Value::as_f64),
        }),
        archon_core::types::command::TaskType::Validate
        | archon_core::types::command::TaskType::Analyze
        | archon_core::types::command::TaskType::Custom => {
            let rooms = cmd
                .context
                .get("rooms")
                .and_then(Value::as_array)
                .map(|rooms| {
                    rooms
                        .iter()
                        .filter_map(|room| {
                            let room_type = room.get("type").and_then(Value::as_str)?.to_string();
                            let area_m2 = room.get("area_m2").and_then(Value::as_f64)?;
                            let door_width_mm = room.get("door_width_mm").and_then(Value::as_i64);
                            Some(ComplianceInput { room_type, area_m2, door_width_mm })
                        })
                        .collect()
                })
                .unwrap_or_default();
            FallbackRequest::Validate(rooms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archon_core::types::command::{Complexity, Locale, TaskType};
    use archon_core::types::tenant::TenantId;
    use serde_json::json;
    use std::collections::HashMap;

    fn command(task_type: TaskType, context: HashMap<String, Value>) -> AICommand {
        AICommand {
            correlation_id: "req_1".to_string(),
            tenant_id: TenantId::new("acme"),
            task_type,
            locale: Locale::new("en-US"),
            prompt_text: "a request".to_string(),
            context,
            complexity: Complexity::Simple,
            file_format: None,
            language: None,
        }
    }

    #[test]
    fn layout_request_reads_room_program_from_context() {
        let mut context = HashMap::new();
        context.insert("total_area_m2".to_string(), json!(90.0));
        context.insert("rooms".to_string(), json!([{"type": "bedroom", "count": 2}]));
        let FallbackRequest::Layout(request) = fallback_request_for(&command(TaskType::Layout, context)) else {
            panic!("expected a layout request");
        };
        assert!((request.total_area_m2 - 90.0).abs() < f64::EPSILON);
        assert_eq!(request.rooms, vec![("bedroom".to_string(), 2)]);
    }

    #[test]
    fn layout_request_defaults_when_context_is_empty() {
        let FallbackRequest::Layout(request) = fallback_request_for(&command(TaskType::Layout, HashMap::new())) else {
            panic!("expected a layout request");
        };
        assert!((request.total_area_m2 - 80.0).abs() < f64::EPSILON);
        assert!(request.rooms.is_empty());
    }

    #[test]
    fn validate_request_reads_room_facts() {
        let mut context = HashMap::new();
        context.insert("rooms".to_string(), json!([{"type": "bedroom", "area_m2": 5.0}]));
        let FallbackRequest::Validate(rooms) = fallback_request_for(&command(TaskType::Validate, context)) else {
            panic!("expected a validate request");
        };
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].room_type, "bedroom");
    }
}
