//! ABOUTME: Append-only usage ledger: one counter per (tenant, category, period)
//! ABOUTME: Periods are calendar months, except `api_calls_hourly` which resets hourly

use crate::tier::UsageCategory;
use archon_core::traits::clock::Clock;
use archon_core::types::tenant::TenantId;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LedgerKey {
    tenant_id: TenantId,
    category: UsageCategory,
    period: String,
}

fn period_for(category: UsageCategory, now: DateTime<Utc>) -> String {
    if category.is_hourly() {
        now.format("%Y-%m-%dT%H").to_string()
    } else {
        now.format("%Y-%m").to_string()
    }
}

/// Durable (within process lifetime) record of how much of each category a
/// tenant has consumed in the current period. Production deploys this
/// behind a real datastore; the in-process map is the seam a persistence
/// layer would wrap.
#[derive(Debug, Default)]
pub struct UsageLedger {
    counters: DashMap<LedgerKey, u32>,
}

impl UsageLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current_usage(&self, tenant_id: &TenantId, category: UsageCategory, clock: &dyn Clock) -> u32 {
        let key = LedgerKey { tenant_id: tenant_id.clone(), category, period: period_for(category, clock.now()) };
        self.counters.get(&key).map_or(0, |count| *count)
    }

    /// Record one unit of `category` consumed by `tenant_id`, returning the
    /// post-increment total for the current period.
    pub fn record(&self, tenant_id: &TenantId, category: UsageCategory, clock: &dyn Clock) -> u32 {
        let key = LedgerKey { tenant_id: tenant_id.clone(), category, period: period_for(category, clock.now()) };
        let mut entry = self.counters.entry(key).or_insert(0);
        *entry += 1;
        *entry
    }
}
