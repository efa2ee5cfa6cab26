//! ABOUTME: Usage Accountant (C9): advisory pre-check plus durable post-hoc recording
//! ABOUTME: A pre-check failure returns `QUOTA_EXCEEDED`; recording never blocks the caller

use crate::ledger::UsageLedger;
use crate::tier::{limits_for_tier, UsageCategory};
use archon_core::error::OrchestratorError;
use archon_core::traits::clock::Clock;
use archon_core::types::tenant::{SubscriptionTier, TenantId};
use tracing::{instrument, warn};

/// Quota accounting for one orchestrator instance. Advisory by design: the
/// pre-check in [`Self::check_allowed`] can race with a concurrent request
/// from the same tenant, so a tenant may occasionally exceed its quota by
/// one in-flight request (spec §4.9) — the ledger record is the source of
/// truth for billing, not the pre-check.
#[derive(Default)]
pub struct UsageAccountant {
    ledger: UsageLedger,
}

impl UsageAccountant {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `Ok(())` when `tenant_id` has remaining quota for `category`
    /// at `tier`, else `Err(OrchestratorError::QuotaExceeded)`.
    #[instrument(skip(self, clock))]
    pub fn check_allowed(&self, tenant_id: &TenantId, tier: SubscriptionTier, category: UsageCategory, clock: &dyn Clock) -> Result<(), OrchestratorError> {
        let limit = limits_for_tier(tier).limit_for(category);
        let used = self.ledger.current_usage(tenant_id, category, clock);
        if used >= limit {
            warn!(tenant_id = %tenant_id, category = category.as_str(), used, limit, "quota exceeded");
            return Err(OrchestratorError::QuotaExceeded {
                category: category.as_str().to_string(),
                remaining: 0,
                limit: u64::from(limit),
            });
        }
        Ok(())
    }

    /// Record one unit of consumption. Called after the work actually
    /// happens, independent of whether `check_allowed` was consulted.
    pub fn record(&self, tenant_id: &TenantId, category: UsageCategory, clock: &dyn Clock) -> u32 {
        self.ledger.record(tenant_id, category, clock)
    }

    #[must_use]
    pub fn remaining(&self, tenant_id: &TenantId, tier: SubscriptionTier, category: UsageCategory, clock: &dyn Clock) -> u32 {
        let limit = limits_for_tier(tier).limit_for(category);
        let used = self.ledger.current_usage(tenant_id, category, clock);
        limit.saturating_sub(used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archon_core::traits::clock::SystemClock;

    #[test]
    fn free_tier_exhausts_layout_quota_after_three() {
        let accountant = UsageAccountant::new();
        let tenant = TenantId::new("acme");
        let clock = SystemClock;
        for _ in 0..3 {
            assert!(accountant.check_allowed(&tenant, SubscriptionTier::Free, UsageCategory::LayoutGenerations, &clock).is_ok());
            accountant.record(&tenant, UsageCategory::LayoutGenerations, &clock);
        }
        assert!(accountant.check_allowed(&tenant, SubscriptionTier::Free, UsageCategory::LayoutGenerations, &clock).is_err());
    }

    #[test]
    fn remaining_reflects_recorded_usage() {
        let accountant = UsageAccountant::new();
        let tenant = TenantId::new("acme");
        let clock = SystemClock;
        accountant.record(&tenant, UsageCategory::DocumentUploads, &clock);
        assert_eq!(accountant.remaining(&tenant, SubscriptionTier::Free, UsageCategory::DocumentUploads, &clock), 4);
    }
}
