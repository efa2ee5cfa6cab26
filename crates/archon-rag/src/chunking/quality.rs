//! ABOUTME: Chunk quality scoring used for reranking and review-flag thresholds

use super::sections::section_markers;

const SENTENCE_END_DELIMITERS: [char; 3] = ['.', '!', '?'];

/// Score a cleaned (whitespace-normalized) chunk in `[0.0, 1.0]`.
///
/// Starts at `1.0` and applies multiplicative penalties/bonuses:
/// - `0.5x` if shorter than 100 characters (low information density).
/// - `0.8x` if more than 30% whitespace.
/// - `1.1x` if it ends on a sentence boundary (well-formed excerpt).
/// - `1.2x` if it contains a section marker (likely high-value content).
///
/// Clamped to `1.0` at the end since bonuses can otherwise exceed it.
#[must_use]
pub fn calculate_quality(content: &str) -> f64 {
    let mut score = 1.0_f64;

    if content.len() < 100 {
        score *= 0.5;
    }

    let space_count = content.chars().filter(|c| *c == ' ').count();
    if content.len() > 0 {
        let whitespace_ratio = space_count as f64 / content.len() as f64;
        if whitespace_ratio > 0.3 {
            score *= 0.8;
        }
    }

    if content.trim_end().ends_with(SENTENCE_END_DELIMITERS) {
        score *= 1.1;
    }

    if section_markers().iter().any(|marker| content.contains(marker)) {
        score *= 1.2;
    }

    score.min(1.0)
}
