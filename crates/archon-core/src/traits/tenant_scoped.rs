//! ABOUTME: Marker trait for any resource that carries a tenant/project scope
//! ABOUTME: Implemented by cache entries, vector index handles, and usage ledger rows

use crate::error::Result;
use crate::state::StateScope;
use async_trait::async_trait;

/// Implemented by any resource whose data is partitioned by `StateScope`.
///
/// Storage backends (`archon-cache`, `archon-rag`'s vector index,
/// `archon-tenancy`'s ledger) use this to guarantee that an operation under
/// one scope never touches another tenant's data, regardless of which
/// concrete backend is plugged in.
#[async_trait]
pub trait TenantScoped: Send + Sync {
    /// The scope this resource currently operates under.
    fn scope(&self) -> &StateScope;

    /// Re-home this resource under a new scope, e.g. when a document is
    /// moved between projects. Returns an error if the transition is invalid
    /// for the concrete resource (e.g. narrowing `Global` to `Tenant`).
    async fn set_scope(&mut self, scope: StateScope) -> Result<()>;
}
