//! ABOUTME: Embedding generation: remote provider with a deterministic local fallback (C2)
//! ABOUTME: Every embedding is stamped with the model id that produced it for cache/index bookkeeping

pub mod cache;
mod local;
mod remote;

pub use cache::{CacheConfig, EmbeddingCache};
pub use local::LocalEmbedder;
pub use remote::RemoteEmbedder;

use archon_core::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed-dimension embedding produced for a single chunk (or query).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingVector {
    pub chunk_id: String,
    pub doc_id: String,
    pub vector: Vec<f32>,
    pub model_id: String,
    pub created_at: DateTime<Utc>,
}

impl EmbeddingVector {
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

/// Produces embeddings for chunk content and ad-hoc queries.
///
/// Implementations are expected to be stateless per call except for
/// internal fitting state (the local fallback fits its vocabulary lazily on
/// first use); callers share one instance across a document's chunks so the
/// vocabulary stays consistent within a corpus.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Stable identifier stamped onto every vector this embedder produces.
    fn model_id(&self) -> &str;

    /// Dimension of every vector this embedder produces.
    fn dimension(&self) -> usize;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let mut batch = self.embed_batch(std::slice::from_ref(&text.to_string())).await?;
        Ok(batch.remove(0))
    }
}

/// Cosine similarity between two equal-length vectors; `0.0` if either is
/// the zero vector (avoids division by zero on unindexed/degenerate input).
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
