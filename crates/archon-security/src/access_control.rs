//! ABOUTME: Tenant-scoped access control for the (out-of-scope) HTTP boundary to consult
//! ABOUTME: The core itself only ever sees an opaque `tenant_id`; this enforces it cannot cross

use crate::audit::{AuditEvent, AuditLogger};
use archon_core::traits::clock::Clock;
use archon_core::types::tenant::TenantId;
use archon_core::StateScope;
use serde::{Deserialize, Serialize};

/// Everything a request carries that access control needs: the caller's own
/// tenant, and the correlation id to stitch the decision into the rest of
/// the request's structured logs (spec §4.12).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityContext {
    pub tenant_id: TenantId,
    pub correlation_id: String,
}

impl SecurityContext {
    #[must_use]
    pub fn new(tenant_id: TenantId, correlation_id: impl Into<String>) -> Self {
        Self { tenant_id, correlation_id: correlation_id.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(String),
}

impl AccessDecision {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// The tenant each `StateScope` variant belongs to, or `None` for scopes
/// that are not tenant-bound (`Global`, and documents/projects, which are
/// always accessed by the tenant id embedded in their own id string by
/// convention — `"{tenant_id}:{project_id}"`). Returns `None` when the
/// scope carries no tenant-identifying information to check.
fn scope_tenant(scope: &StateScope) -> Option<&str> {
    match scope {
        StateScope::Global => None,
        StateScope::Tenant(id) | StateScope::Project(id) | StateScope::Document(id) => Some(id.split(':').next().unwrap_or(id.as_str())),
    }
}

/// Enforces that a request can only ever read or write state scoped to its
/// own tenant. Every vector index query, cache lookup, and usage-ledger
/// read in the core is expected to pass through this check at the
/// boundary, so a compromised or misconfigured caller cannot observe
/// another tenant's documents, cache entries, or usage (spec §5's vector
/// index isolation requirement, generalized to every `StateScope`-tagged
/// store).
pub struct TenantIsolationPolicy {
    audit: AuditLogger,
}

impl TenantIsolationPolicy {
    #[must_use]
    pub fn new(audit: AuditLogger) -> Self {
        Self { audit }
    }

    pub fn check(&self, context: &SecurityContext, requested_scope: &StateScope, clock: &dyn Clock) -> AccessDecision {
        match scope_tenant(requested_scope) {
            None => AccessDecision::Allow,
            Some(owner) if owner == context.tenant_id.as_str() => {
                self.audit.record(AuditEvent::AccessGranted { tenant_id: context.tenant_id.as_str().to_string(), correlation_id: context.correlation_id.clone(), scope: requested_scope.tag() }, clock);
                AccessDecision::Allow
            }
            Some(owner) => {
                let reason = format!("tenant {} attempted to access scope owned by {owner}", context.tenant_id);
                self.audit.record(
                    AuditEvent::CrossTenantAttempt { requesting_tenant_id: context.tenant_id.as_str().to_string(), owning_tenant_id: owner.to_string(), correlation_id: context.correlation_id.clone(), scope: requested_scope.tag() },
                    clock,
                );
                AccessDecision::Deny(reason)
            }
        }
    }
}
