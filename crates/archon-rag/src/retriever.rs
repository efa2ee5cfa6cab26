//! ABOUTME: RAG retriever (C3): composes the chunker, embedder, and vector index
//! ABOUTME: into a single "index a document" / "retrieve passages for a query" interface

use crate::chunking::{ChunkingConfig, DocumentChunker};
use crate::embeddings::{Embedder, EmbeddingCache, EmbeddingVector};
use crate::vector::{SearchFilters, SimilarityResult, VectorIndex};
use archon_core::error::Result;
use archon_core::StateScope;
use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;

pub struct RetrieverConfig {
    pub max_results: usize,
    pub similarity_threshold: f32,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            similarity_threshold: 0.1,
        }
    }
}

/// Composes chunking, embedding, and vector search into the retrieval
/// interface that the prompt assembler (C4) consults.
pub struct RagRetriever {
    chunker: DocumentChunker,
    embedder: Arc<dyn Embedder>,
    cache: EmbeddingCache,
    index: VectorIndex,
    config: RetrieverConfig,
}

impl RagRetriever {
    #[must_use]
    pub fn new(chunking_config: ChunkingConfig, embedder: Arc<dyn Embedder>, retriever_config: RetrieverConfig) -> Self {
        Self {
            chunker: DocumentChunker::new(chunking_config),
            embedder,
            cache: EmbeddingCache::new(crate::embeddings::CacheConfig::default()),
            index: VectorIndex::new(),
            config: retriever_config,
        }
    }

    /// Chunk, embed, and index a document's full text under `scope`.
    /// Returns the number of chunks indexed.
    #[instrument(skip(self, content))]
    pub async fn index_document(&self, doc_id: &str, content: &str, language: &str, scope: StateScope) -> Result<usize> {
        let chunks = self.chunker.chunk_document(doc_id, content, language);
        let mut indexed = 0usize;

        let uncached: Vec<(usize, String)> = chunks
            .iter()
            .enumerate()
            .filter(|(_, chunk)| {
                self.cache
                    .get(&EmbeddingCache::key_for(self.embedder.model_id(), &chunk.content))
                    .is_none()
            })
            .map(|(i, chunk)| (i, chunk.content.clone()))
            .collect();

        if !uncached.is_empty() {
            let texts: Vec<String> = uncached.iter().map(|(_, text)| text.clone()).collect();
            let vectors = self.embedder.embed_batch(&texts).await?;
            for ((_, text), vector) in uncached.into_iter().zip(vectors) {
                self.cache.put(EmbeddingCache::key_for(self.embedder.model_id(), &text), vector);
            }
        }

        for chunk in chunks {
            let vector = self
                .cache
                .get(&EmbeddingCache::key_for(self.embedder.model_id(), &chunk.content))
                .expect("embedding was just computed or already cached");

            let embedding = EmbeddingVector {
                chunk_id: chunk.chunk_id.clone(),
                doc_id: chunk.doc_id.clone(),
                vector,
                model_id: self.embedder.model_id().to_string(),
                created_at: Utc::now(),
            };
            self.index.insert(chunk, embedding, scope.clone())?;
            indexed += 1;
        }

        Ok(indexed)
    }

    /// Retrieve the top passages relevant to `query`, scoped to `scope`.
    #[instrument(skip(self, query))]
    pub async fn retrieve(&self, query: &str, language: Option<&str>, scope: StateScope) -> Result<Vec<SimilarityResult>> {
        let query_vector = self.embedder.embed_query(query).await?;
        let filters = SearchFilters {
            scope: Some(scope),
            language: language.map(str::to_string),
            min_content_length: None,
        };
        Ok(self.index.search(&query_vector, &filters, self.config.max_results, self.config.similarity_threshold))
    }

    #[must_use]
    pub fn indexed_chunk_count(&self) -> usize {
        self.index.len()
    }

    pub fn remove_document(&self, doc_id: &str) {
        self.index.remove_document(doc_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::LocalEmbedder;

    fn retriever() -> RagRetriever {
        RagRetriever::new(ChunkingConfig::default(), Arc::new(LocalEmbedder::default()), RetrieverConfig::default())
    }

    #[tokio::test]
    async fn indexing_then_retrieving_finds_relevant_passage() {
        let retriever = retriever();
        let content = "Article 1: Fire Safety\nAll exits must remain unobstructed at all times during occupancy. \
                        Emergency lighting shall illuminate every exit path continuously.\n\nArticle 2: Plumbing\n\
                        Bathroom fixtures must meet minimum clearance requirements established by the local authority.";
        let indexed = retriever
            .index_document("doc1", content, "en", StateScope::tenant("acme"))
            .await
            .unwrap();
        assert!(indexed > 0);

        let results = retriever
            .retrieve("fire safety exit requirements", Some("en"), StateScope::tenant("acme"))
            .await
            .unwrap();
        assert!(!results.is_empty());
    }

    #[tokio::test]
    async fn retrieval_is_isolated_by_scope() {
        let retriever = retriever();
        retriever
            .index_document("doc1", "Article 1: Fire Safety exits must be clear.", "en", StateScope::tenant("acme"))
            .await
            .unwrap();

        let results = retriever
            .retrieve("fire safety", Some("en"), StateScope::tenant("other"))
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}
