//! ABOUTME: Document chunking, embeddings, vector indexing, and RAG retrieval
//! ABOUTME: Implements C1 (chunker), C2 (embeddings + vector index), and C3 (retriever)

pub mod chunking;
pub mod embeddings;
pub mod retriever;
pub mod vector;

pub use chunking::{ChunkingConfig, DocumentChunk, DocumentChunker};
pub use embeddings::{Embedder, EmbeddingVector, LocalEmbedder, RemoteEmbedder};
pub use retriever::{RagRetriever, RetrieverConfig};
pub use vector::{SearchFilters, SimilarityResult, VectorIndex};
