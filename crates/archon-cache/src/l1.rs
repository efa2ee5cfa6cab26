//! ABOUTME: L1: bounded in-process cache with per-entry TTL and tag-based invalidation
//! ABOUTME: Capacity eviction is approximate LRU; correctness favors simplicity over exactness

use crate::key::CacheKey;
use archon_core::traits::clock::Clock;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;

struct Entry {
    value: Value,
    expires_at: DateTime<Utc>,
    tags: Vec<String>,
}

/// In-process cache tier. Cheap to clone (it's a handle around shared
/// state), so it can live behind an `Arc` or be cloned directly into each
/// request-handling task.
#[derive(Clone)]
pub struct L1Cache {
    capacity: usize,
    entries: std::sync::Arc<DashMap<CacheKey, Entry>>,
    order: std::sync::Arc<Mutex<VecDeque<CacheKey>>>,
}

impl L1Cache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: std::sync::Arc::new(DashMap::new()),
            order: std::sync::Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Fetch `key` if present and not expired as of `clock.now()`. An
    /// expired entry is removed on read rather than waited on for eviction.
    #[must_use]
    pub fn get(&self, key: &CacheKey, clock: &dyn Clock) -> Option<Value> {
        let now = clock.now();
        let hit = self.entries.get(key).map(|entry| (entry.expires_at, entry.value.clone()));
        match hit {
            Some((expires_at, value)) if expires_at > now => {
                self.touch(key);
                Some(value)
            }
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: CacheKey, value: Value, ttl: Duration, tags: Vec<String>, clock: &dyn Clock) {
        let expires_at = clock.now() + ttl;
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.entries.insert(key.clone(), Entry { value, expires_at, tags });
        self.touch(&key);
    }

    /// Drop every entry whose tag set contains `tag`. Tags let the
    /// coordinator invalidate, e.g., every cached result for a tenant
    /// without tracking individual keys (spec §4.8).
    pub fn invalidate_by_tag(&self, tag: &str) {
        self.entries.retain(|_, entry| !entry.tags.iter().any(|t| t == tag));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&self, key: &CacheKey) {
        let mut order = self.order.lock();
        order.retain(|k| k != key);
        order.push_back(key.clone());
    }

    fn evict_oldest(&self) {
        let oldest = self.order.lock().pop_front();
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archon_core::traits::clock::SystemClock;
    use serde_json::json;

    fn key(value: &str) -> CacheKey {
        CacheKey::from_parts("layout", value, &std::collections::HashMap::new(), "en-US")
    }

    #[test]
    fn stores_and_retrieves_a_value() {
        let cache = L1Cache::new(10);
        let clock = SystemClock;
        cache.insert(key("a"), json!({"ok": true}), Duration::seconds(60), Vec::new(), &clock);
        assert_eq!(cache.get(&key("a"), &clock), Some(json!({"ok": true})));
    }

    #[test]
    fn expired_entry_is_not_returned() {
        let cache = L1Cache::new(10);
        let clock = SystemClock;
        cache.insert(key("a"), json!(1), Duration::seconds(-1), Vec::new(), &clock);
        assert_eq!(cache.get(&key("a"), &clock), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn capacity_overflow_evicts_the_oldest_entry() {
        let cache = L1Cache::new(2);
        let clock = SystemClock;
        cache.insert(key("a"), json!(1), Duration::seconds(60), Vec::new(), &clock);
        cache.insert(key("b"), json!(2), Duration::seconds(60), Vec::new(), &clock);
        cache.insert(key("c"), json!(3), Duration::seconds(60), Vec::new(), &clock);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&key("a"), &clock), None);
        assert!(cache.get(&key("c"), &clock).is_some());
    }

    #[test]
    fn tag_invalidation_removes_matching_entries_only() {
        let cache = L1Cache::new(10);
        let clock = SystemClock;
        cache.insert(key("a"), json!(1), Duration::seconds(60), vec!["tenant:acme".to_string()], &clock);
        cache.insert(key("b"), json!(2), Duration::seconds(60), vec!["tenant:other".to_string()], &clock);
        cache.invalidate_by_tag("tenant:acme");
        assert_eq!(cache.get(&key("a"), &clock), None);
        assert!(cache.get(&key("b"), &clock).is_some());
    }
}
