//! ABOUTME: Append-only audit log for access-control decisions
//! ABOUTME: In-process ring buffer today; swap for a durable sink without touching callers

use archon_core::traits::clock::Clock;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

const MAX_ENTRIES: usize = 10_000;

/// Security-relevant events worth a durable trail, independent of the
/// request-scoped structured logs every component already emits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AuditEvent {
    AccessGranted { tenant_id: String, correlation_id: String, scope: String },
    CrossTenantAttempt { requesting_tenant_id: String, owning_tenant_id: String, correlation_id: String, scope: String },
    RateLimitExceeded { tenant_id: String, correlation_id: String, limit: u32 },
    QuotaExceeded { tenant_id: String, correlation_id: String, category: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub event: AuditEvent,
}

/// Thread-safe append-only log, keyed by a monotonic id so entries can be
/// paged without locking the whole structure. Oldest entries are evicted
/// once [`MAX_ENTRIES`] is exceeded — this is a debugging aid, not the
/// system of record for billing or compliance.
pub struct AuditLogger {
    entries: DashMap<u64, AuditEntry>,
    next_id: AtomicU64,
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditLogger {
    #[must_use]
    pub fn new() -> Self {
        Self { entries: DashMap::new(), next_id: AtomicU64::new(0) }
    }

    pub fn record(&self, event: AuditEvent, clock: &dyn Clock) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        match &event {
            AuditEvent::CrossTenantAttempt { requesting_tenant_id, owning_tenant_id, .. } => {
                warn!(requesting_tenant_id, owning_tenant_id, "cross-tenant access attempt denied");
            }
            AuditEvent::RateLimitExceeded { tenant_id, limit, .. } => {
                warn!(tenant_id, limit, "rate limit exceeded");
            }
            AuditEvent::QuotaExceeded { tenant_id, category, .. } => {
                warn!(tenant_id, category, "quota exceeded");
            }
            AuditEvent::AccessGranted { tenant_id, scope, .. } => {
                info!(tenant_id, scope, "access granted");
            }
        }
        self.entries.insert(id, AuditEntry { id, timestamp: clock.now(), event });
        if self.entries.len() > MAX_ENTRIES {
            if let Some(oldest) = self.entries.iter().map(|e| e.id).min() {
                self.entries.remove(&oldest);
            }
        }
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<AuditEntry> {
        self.entries.get(&id).map(|e| e.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archon_core::traits::clock::SystemClock;

    #[test]
    fn recorded_entries_are_retrievable_by_id() {
        let log = AuditLogger::new();
        let id = log.record(AuditEvent::AccessGranted { tenant_id: "acme".to_string(), correlation_id: "req_1".to_string(), scope: "tenant:acme".to_string() }, &SystemClock);
        assert_eq!(log.len(), 1);
        assert!(log.get(id).is_some());
    }

    #[test]
    fn log_evicts_oldest_entry_past_capacity() {
        let log = AuditLogger::new();
        for i in 0..(MAX_ENTRIES + 5) {
            log.record(AuditEvent::AccessGranted { tenant_id: format!("t{i}"), correlation_id: "req".to_string(), scope: "tenant:t".to_string() }, &SystemClock);
        }
        assert_eq!(log.len(), MAX_ENTRIES);
    }
}
