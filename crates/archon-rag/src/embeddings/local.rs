//! ABOUTME: Deterministic local embedder used when no remote provider is configured
//! ABOUTME: Hashes term frequencies into a fixed-width vector; no network, no model weights

use super::Embedder;
use archon_core::error::Result;
use async_trait::async_trait;
use sha2::{Digest, Sha256};

/// Hashing bag-of-words embedder: every token is hashed into one of `D`
/// buckets and the bucket is incremented, then the vector is L2-normalized.
///
/// This mirrors the role the TF-IDF fallback plays in the original
/// system — a zero-dependency, fully deterministic embedding that keeps the
/// pipeline usable when no remote embedding API is reachable — without
/// requiring a fitted vocabulary or any ML runtime.
pub struct LocalEmbedder {
    dimension: usize,
}

impl LocalEmbedder {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut buckets = vec![0.0_f32; self.dimension];
        for token in tokenize(text) {
            let bucket = hash_bucket(&token, self.dimension);
            buckets[bucket] += 1.0;
        }
        normalize(&mut buckets);
        buckets
    }
}

impl Default for LocalEmbedder {
    fn default() -> Self {
        Self::new(512)
    }
}

#[async_trait]
impl Embedder for LocalEmbedder {
    fn model_id(&self) -> &str {
        "local-hashing-512d"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| s.len() > 2)
        .map(str::to_string)
        .collect()
}

fn hash_bucket(token: &str, dimension: usize) -> usize {
    let digest = Sha256::digest(token.as_bytes());
    let value = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    (value as usize) % dimension
}

fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn produces_vectors_of_the_configured_dimension() {
        let embedder = LocalEmbedder::new(128);
        let vectors = embedder
            .embed_batch(&["a wall is a vertical structure".to_string()])
            .await
            .unwrap();
        assert_eq!(vectors[0].len(), 128);
    }

    #[tokio::test]
    async fn identical_text_produces_identical_vectors() {
        let embedder = LocalEmbedder::default();
        let a = embedder.embed_one("fire safety requirements for exits");
        let b = embedder.embed_one("fire safety requirements for exits");
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn different_text_usually_produces_different_vectors() {
        let embedder = LocalEmbedder::default();
        let a = embedder.embed_one("fire safety requirements for exits");
        let b = embedder.embed_one("plumbing code for bathroom fixtures");
        assert_ne!(a, b);
    }
}
