//! ABOUTME: Document chunking: section splitting, paragraph/character chunking, quality scoring
//! ABOUTME: Mirrors the boundary-preservation rules used by the RAG retriever (C1)

mod quality;
mod sections;

pub use quality::calculate_quality;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tunable chunking parameters. Defaults match the architectural-document
/// corpus this service was built for (building codes, regulations).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
    pub respect_sentences: bool,
    pub respect_paragraphs: bool,
    pub min_chunk_size: usize,
    pub max_chunk_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
            respect_sentences: true,
            respect_paragraphs: true,
            min_chunk_size: 100,
            max_chunk_size: 2000,
        }
    }
}

/// Kind of split that produced a chunk; carried in metadata for observability
/// and for the fallback-chain tests that assert boundary preservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    CompleteSection,
    ParagraphSplit,
    CharacterSplit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub section_index: usize,
    pub language: String,
    pub chunk_type: ChunkType,
    pub content_length: usize,
    pub word_count: usize,
    pub quality_score: f64,
    #[serde(default)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A single chunk of a document, ready for embedding.
///
/// `chunk_id` is always `"{doc_id}_chunk_{index}"`; `index` is monotonic
/// within the document (not just within a section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub chunk_id: String,
    pub doc_id: String,
    pub index: usize,
    pub content: String,
    pub metadata: ChunkMetadata,
}

/// Splits document text into overlapping, boundary-respecting chunks.
///
/// Algorithm: split into logical sections by header detection, then chunk
/// each section independently (paragraph accumulation, falling back to
/// sentence-boundary character splitting for sections without paragraph
/// breaks), then post-process for quality and drop undersized fragments.
pub struct DocumentChunker {
    config: ChunkingConfig,
}

impl DocumentChunker {
    #[must_use]
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Chunk `content` belonging to `doc_id`, written in `language`
    /// (an ISO 639-1 code; unrecognized codes fall back to English
    /// sentence delimiters).
    #[must_use]
    pub fn chunk_document(&self, doc_id: &str, content: &str, language: &str) -> Vec<DocumentChunk> {
        let sections = sections::split_into_sections(content);
        let mut chunks = Vec::new();
        let mut next_index = 0usize;

        for (section_index, section) in sections.iter().enumerate() {
            let section_chunks = self.chunk_section(section, doc_id, section_index, next_index, language);
            next_index += section_chunks.len();
            chunks.extend(section_chunks);
        }

        self.post_process(chunks)
    }

    fn chunk_section(
        &self,
        section: &str,
        doc_id: &str,
        section_index: usize,
        start_index: usize,
        language: &str,
    ) -> Vec<DocumentChunk> {
        if section.chars().count() <= self.config.max_chunk_size {
            return vec![self.make_chunk(
                doc_id,
                start_index,
                section.to_string(),
                section_index,
                language,
                ChunkType::CompleteSection,
            )];
        }

        if self.config.respect_paragraphs {
            self.chunk_by_paragraphs(section, doc_id, section_index, start_index, language)
        } else {
            self.chunk_by_characters(section, doc_id, section_index, start_index, language)
        }
    }

    fn chunk_by_paragraphs(
        &self,
        section: &str,
        doc_id: &str,
        section_index: usize,
        start_index: usize,
        language: &str,
    ) -> Vec<DocumentChunk> {
        let mut chunks = Vec::new();
        let mut chunk_index = start_index;
        let mut current = String::new();

        for para in section.split("\n\n") {
            let para = para.trim();
            if para.is_empty() {
                continue;
            }

            if current.chars().count() + para.chars().count() + 2 > self.config.chunk_size
                && current.chars().count() >= self.config.min_chunk_size
            {
                chunks.push(self.make_chunk(
                    doc_id,
                    chunk_index,
                    current.trim().to_string(),
                    section_index,
                    language,
                    ChunkType::ParagraphSplit,
                ));

                let overlap = overlap_text(&current, self.config.overlap);
                current = if overlap.is_empty() {
                    para.to_string()
                } else {
                    format!("{overlap}\n\n{para}")
                };
                chunk_index += 1;
            } else if current.is_empty() {
                current = para.to_string();
            } else {
                current.push_str("\n\n");
                current.push_str(para);
            }
        }

        if !current.trim().is_empty() {
            chunks.push(self.make_chunk(
                doc_id,
                chunk_index,
                current.trim().to_string(),
                section_index,
                language,
                ChunkType::ParagraphSplit,
            ));
        }

        chunks
    }

    fn chunk_by_characters(
        &self,
        text: &str,
        doc_id: &str,
        section_index: usize,
        start_index: usize,
        language: &str,
    ) -> Vec<DocumentChunk> {
        let chars: Vec<char> = text.chars().collect();
        let mut chunks = Vec::new();
        let mut chunk_index = start_index;
        let mut start = 0usize;

        while start < chars.len() {
            let mut end = (start + self.config.chunk_size).min(chars.len());

            if end < chars.len() && self.config.respect_sentences {
                let min_end = start + self.config.min_chunk_size;
                if let Some(boundary) = sections::find_sentence_boundary(&chars, end, language, min_end) {
                    end = boundary;
                }
            }

            let content: String = chars[start..end].iter().collect();
            let content = content.trim().to_string();
            if !content.is_empty() {
                chunks.push(self.make_chunk(
                    doc_id,
                    chunk_index,
                    content,
                    section_index,
                    language,
                    ChunkType::CharacterSplit,
                ));
                chunk_index += 1;
            }

            if end >= chars.len() {
                break;
            }
            start = end.saturating_sub(self.config.overlap);
        }

        chunks
    }

    fn make_chunk(
        &self,
        doc_id: &str,
        index: usize,
        content: String,
        section_index: usize,
        language: &str,
        chunk_type: ChunkType,
    ) -> DocumentChunk {
        DocumentChunk {
            chunk_id: format!("{doc_id}_chunk_{index}"),
            doc_id: doc_id.to_string(),
            index,
            content,
            metadata: ChunkMetadata {
                section_index,
                language: language.to_string(),
                chunk_type,
                content_length: 0,
                word_count: 0,
                quality_score: 0.0,
                extra: HashMap::new(),
            },
        }
    }

    /// Drop undersized fragments, normalize whitespace, and stamp
    /// length/word-count/quality metadata. Indices are NOT renumbered here:
    /// a dropped chunk leaves a gap, which is acceptable since `index` only
    /// needs to be monotonic, not contiguous.
    fn post_process(&self, chunks: Vec<DocumentChunk>) -> Vec<DocumentChunk> {
        chunks
            .into_iter()
            .filter_map(|mut chunk| {
                let normalized: String = chunk.content.split_whitespace().collect::<Vec<_>>().join(" ");
                if normalized.len() < self.config.min_chunk_size {
                    return None;
                }
                chunk.metadata.content_length = normalized.len();
                chunk.metadata.word_count = normalized.split_whitespace().count();
                chunk.metadata.quality_score = quality::calculate_quality(&normalized);
                chunk.content = normalized;
                Some(chunk)
            })
            .collect()
    }
}

fn overlap_text(text: &str, overlap_size: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= overlap_size {
        return text.to_string();
    }
    let tail: String = chars[chars.len() - overlap_size..].iter().collect();
    match tail.find(' ') {
        Some(idx) if idx + 1 < tail.len() => tail[idx + 1..].to_string(),
        _ => tail,
    }
}
