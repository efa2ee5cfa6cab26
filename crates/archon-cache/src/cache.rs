//! ABOUTME: `ResultCache`: the L1+L2 read-through/write-through composition the coordinator uses
//! ABOUTME: L1 miss falls through to L2; an L2 hit backfills L1 (spec §4.8)

use crate::key::CacheKey;
use crate::l1::L1Cache;
use crate::l2::{L2Backend, L2Error};
use archon_core::traits::clock::Clock;
use chrono::Duration;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Default time-to-live for a cached AI result. Long enough to absorb
/// repeated identical requests within a session, short enough that stale
/// regional-code or template changes surface promptly (spec §4.8).
pub const DEFAULT_TTL: Duration = Duration::hours(6);

pub struct ResultCache {
    l1: L1Cache,
    l2: Arc<dyn L2Backend>,
}

impl ResultCache {
    #[must_use]
    pub fn new(l1_capacity: usize, l2: Arc<dyn L2Backend>) -> Self {
        Self { l1: L1Cache::new(l1_capacity), l2 }
    }

    /// L1 first; on miss, try L2 and backfill L1 on hit. An L2 failure
    /// degrades to a miss rather than propagating — a cache is never
    /// allowed to turn an outage into a request failure.
    #[instrument(skip(self, clock))]
    pub async fn get(&self, key: &CacheKey, clock: &dyn Clock) -> Option<Value> {
        if let Some(value) = self.l1.get(key, clock) {
            debug!("cache hit in L1");
            return Some(value);
        }

        match self.l2.get(key).await {
            Ok(Some(value)) => {
                debug!("cache hit in L2, backfilling L1");
                let backfill_ttl = DEFAULT_TTL.min(Duration::hours(1));
                self.l1.insert(key.clone(), value.clone(), backfill_ttl, Vec::new(), clock);
                Some(value)
            }
            Ok(None) => None,
            Err(err) => {
                debug!(error = %err, "L2 unavailable, treating as a miss");
                None
            }
        }
    }

    /// Write through both tiers. `tags` are local to L1 (spec §4.8 scopes
    /// tag invalidation to the process, since L2 is shared across tenants).
    #[instrument(skip(self, value, clock))]
    pub async fn put(&self, key: CacheKey, value: Value, tags: Vec<String>, clock: &dyn Clock) -> Result<(), L2Error> {
        self.l1.insert(key.clone(), value.clone(), DEFAULT_TTL, tags, clock);
        self.l2.set(&key, value, DEFAULT_TTL.num_seconds()).await
    }

    pub fn invalidate_tag(&self, tag: &str) {
        self.l1.invalidate_by_tag(tag);
    }

    pub async fn invalidate_key(&self, key: &CacheKey) -> Result<(), L2Error> {
        self.l2.delete(key).await
    }
}
