//! ABOUTME: In-process embedding cache: avoids re-embedding unchanged chunk content
//! ABOUTME: LRU-by-access-count eviction with a TTL, keyed by content hash + model id

use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

struct CacheEntry {
    embedding: Vec<f32>,
    created_at: Instant,
    access_count: u64,
    last_accessed: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Process-local embedding cache. Keys are `sha256(model_id || "\0" || text)`
/// so the same content under two different models never collides.
pub struct EmbeddingCache {
    config: CacheConfig,
    entries: RwLock<HashMap<String, CacheEntry>>,
    hits: std::sync::atomic::AtomicU64,
    misses: std::sync::atomic::AtomicU64,
}

impl EmbeddingCache {
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
            hits: std::sync::atomic::AtomicU64::new(0),
            misses: std::sync::atomic::AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn key_for(model_id: &str, text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(model_id.as_bytes());
        hasher.update(b"\0");
        hasher.update(text.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Vec<f32>> {
        use std::sync::atomic::Ordering;

        let mut entries = self.entries.write();
        let expired = entries.get(key).is_some_and(|e| e.is_expired(self.config.ttl));
        if expired {
            entries.remove(key);
        }

        match entries.get_mut(key) {
            Some(entry) => {
                entry.access_count += 1;
                entry.last_accessed = Instant::now();
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.embedding.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn put(&self, key: String, embedding: Vec<f32>) {
        let mut entries = self.entries.write();
        if entries.len() >= self.config.max_entries && !entries.contains_key(&key) {
            self.evict_least_recently_used(&mut entries);
        }
        entries.insert(
            key,
            CacheEntry {
                embedding,
                created_at: Instant::now(),
                access_count: 0,
                last_accessed: Instant::now(),
            },
        );
    }

    fn evict_least_recently_used(&self, entries: &mut HashMap<String, CacheEntry>) {
        if let Some(oldest_key) = entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_accessed)
            .map(|(k, _)| k.clone())
        {
            entries.remove(&oldest_key);
        }
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        use std::sync::atomic::Ordering;
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.read().len(),
        }
    }
}
