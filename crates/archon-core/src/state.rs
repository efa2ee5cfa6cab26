//! ABOUTME: Scoping primitives used for tenant isolation across storage backends
//! ABOUTME: Every vector index, cache entry, and usage record is tagged with a `StateScope`

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hierarchical scope used to isolate state between tenants, projects, and documents.
///
/// Backends (vector index, cache, usage ledger) use this to guarantee that a
/// query issued under one scope never observes data written under another,
/// independent of the storage engine behind them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateScope {
    /// Not tenant-specific; used for global configuration and shared catalogs.
    Global,
    /// Scoped to a single tenant.
    Tenant(String),
    /// Scoped to a single project within a tenant.
    Project(String),
    /// Scoped to a single document's derived chunks/vectors.
    Document(String),
}

impl StateScope {
    #[must_use]
    pub fn tenant(id: impl Into<String>) -> Self {
        Self::Tenant(id.into())
    }

    #[must_use]
    pub fn project(id: impl Into<String>) -> Self {
        Self::Project(id.into())
    }

    #[must_use]
    pub fn document(id: impl Into<String>) -> Self {
        Self::Document(id.into())
    }

    /// Stable string used as a cache/index tag, e.g. `"tenant:acme"`.
    #[must_use]
    pub fn tag(&self) -> String {
        match self {
            Self::Global => "global".to_string(),
            Self::Tenant(id) => format!("tenant:{id}"),
            Self::Project(id) => format!("project:{id}"),
            Self::Document(id) => format!("document:{id}"),
        }
    }
}

impl fmt::Display for StateScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_stable_and_distinct() {
        assert_eq!(StateScope::Global.tag(), "global");
        assert_eq!(StateScope::tenant("acme").tag(), "tenant:acme");
        assert_ne!(StateScope::tenant("acme").tag(), StateScope::project("acme").tag());
    }
}
