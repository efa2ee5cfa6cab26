//! ABOUTME: Sample requests and a steppable clock reused across crates' `#[cfg(test)]` modules
//! ABOUTME: Nothing here talks to a real provider, cache, or clock; everything is in-process

use archon_core::traits::clock::Clock;
use archon_core::types::command::{AICommand, Complexity, Locale, TaskType};
use archon_core::types::tenant::TenantId;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// A representative `layout` request for `acme`, matching scenario S1 in
/// shape (a simple residential layout). Callers that need a different
/// `task_type`/`complexity` should clone and mutate rather than hand-roll
/// a new `AICommand`, so fixture drift stays in one place.
#[must_use]
pub fn sample_ai_command(correlation_id: impl Into<String>) -> AICommand {
    let mut context = HashMap::new();
    context.insert("total_area_m2".to_string(), serde_json::json!(80));
    context.insert(
        "rooms".to_string(),
        serde_json::json!([
            { "type": "bedroom", "count": 2 },
            { "type": "bathroom", "count": 1 },
            { "type": "kitchen", "count": 1 },
            { "type": "living_room", "count": 1 },
        ]),
    );

    AICommand {
        correlation_id: correlation_id.into(),
        tenant_id: TenantId::new("acme"),
        task_type: TaskType::Layout,
        locale: Locale::new("en-US"),
        prompt_text: "Design an 80 square meter two bedroom apartment".to_string(),
        context,
        complexity: Complexity::Medium,
        file_format: None,
        language: None,
    }
}

/// Deterministic, manually-advanced clock. Tests that need to observe
/// period rollover (usage ledgers) or elapsed-time measurement (workflow
/// step timing) construct one fixed at a known instant and call
/// [`FakeClock::advance`] instead of sleeping or racing `SystemClock`.
pub struct FakeClock {
    now: Mutex<DateTime<Utc>>,
}

impl FakeClock {
    #[must_use]
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn advance(&self, delta: Duration) {
        let mut guard = self.now.lock().expect("fake clock lock poisoned");
        *guard += delta;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("fake clock lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_command_round_trips_through_the_cache_key_derivation() {
        let cmd = sample_ai_command("req_1");
        assert_eq!(cmd.task_type, TaskType::Layout);
        assert_eq!(cmd.tenant_id, TenantId::new("acme"));
    }

    #[test]
    fn fake_clock_only_advances_when_told_to() {
        let start = "2026-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let clock = FakeClock::at(start);
        assert_eq!(clock.now(), start);
        clock.advance(Duration::hours(1));
        assert_eq!(clock.now(), start + Duration::hours(1));
    }
}
