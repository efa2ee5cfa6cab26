//! ABOUTME: L2: the external key/value backend seam (Redis in production per spec §6)
//! ABOUTME: `NullL2` and the in-memory test double let callers run without a real backend

use crate::key::CacheKey;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum L2Error {
    #[error("L2 backend unavailable: {0}")]
    Unavailable(String),
}

/// External cache tier, reachable across process restarts and shared by
/// every orchestrator instance. Production wires this to Redis; the trait
/// seam keeps `archon-cache` free of a hard Redis dependency (spec §6).
#[async_trait]
pub trait L2Backend: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>, L2Error>;
    async fn set(&self, key: &CacheKey, value: Value, ttl_seconds: i64) -> Result<(), L2Error>;
    async fn delete(&self, key: &CacheKey) -> Result<(), L2Error>;
}

/// An L2 that never stores anything. Used when only L1 is configured, or as
/// a degrade-gracefully fallback if the real backend is unreachable.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullL2;

#[async_trait]
impl L2Backend for NullL2 {
    async fn get(&self, _key: &CacheKey) -> Result<Option<Value>, L2Error> {
        Ok(None)
    }

    async fn set(&self, _key: &CacheKey, _value: Value, _ttl_seconds: i64) -> Result<(), L2Error> {
        Ok(())
    }

    async fn delete(&self, _key: &CacheKey) -> Result<(), L2Error> {
        Ok(())
    }
}

/// In-memory stand-in for integration tests that need L2 to actually
/// remember values across an L1 miss.
#[derive(Debug, Default, Clone)]
pub struct InMemoryL2 {
    store: Arc<Mutex<HashMap<CacheKey, Value>>>,
}

#[async_trait]
impl L2Backend for InMemoryL2 {
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>, L2Error> {
        Ok(self.store.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &CacheKey, value: Value, _ttl_seconds: i64) -> Result<(), L2Error> {
        self.store.lock().await.insert(key.clone(), value);
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> Result<(), L2Error> {
        self.store.lock().await.remove(key);
        Ok(())
    }
}
