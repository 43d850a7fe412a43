use super::{char_len, SegmentationStrategy};
use crate::config::ChunkingConfig;
use crate::document::chunk::{Chunk, ContentKind, DocumentId, IdGenerator};
use crate::document::region::Region;
use crate::document::sentence::split_sentences;
use tracing::debug;

/// Sentences carried into the next chunk.
const OVERLAP_SENTENCES: usize = 2;

/// Greedy sentence packing up to `size` characters, with the tail of each
/// chunk repeated at the head of the next.
#[derive(Debug, Clone, Copy)]
pub struct FixedSizeStrategy {
    size: usize,
    overlap_chars: usize,
}

impl FixedSizeStrategy {
    pub fn new(size: usize, overlap_chars: usize) -> Self {
        Self {
            size,
            overlap_chars,
        }
    }

    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.size, config.overlap_chars())
    }

    /// Leading `overlap_chars` of the last two sentences.
    fn overlap_from<S: AsRef<str>>(&self, sentences: &[S]) -> Option<String> {
        if self.overlap_chars == 0 || sentences.is_empty() {
            return None;
        }

        let start = sentences.len().saturating_sub(OVERLAP_SENTENCES);
        let joined = sentences[start..]
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(" ");
        let overlap = head_chars(&joined, self.overlap_chars).trim();

        if overlap.is_empty() {
            None
        } else {
            Some(overlap.to_string())
        }
    }

    fn push_chunk(
        &self,
        chunks: &mut Vec<Chunk>,
        document_id: &DocumentId,
        ids: &dyn IdGenerator,
        content: &str,
        confidence: f32,
        overlap_with_next: Option<String>,
    ) {
        let mut chunk = Chunk::new(
            ids.next_id(),
            document_id.clone(),
            content.trim(),
            ContentKind::Paragraph,
            confidence,
        )
        .with_sequence_index(chunks.len());

        if let Some(prev) = chunks.last_mut() {
            prev.continues_to_next = true;
            chunk.overlap_with_prev = prev.overlap_with_next.clone();
            chunk.is_continuation = true;
        }
        chunk.overlap_with_next = overlap_with_next;

        chunks.push(chunk);
    }
}

impl SegmentationStrategy for FixedSizeStrategy {
    fn segment(
        &self,
        document_id: &DocumentId,
        regions: &[Region],
        ids: &dyn IdGenerator,
    ) -> Vec<Chunk> {
        let eligible: Vec<&Region> = regions
            .iter()
            .filter(|r| !r.kind.is_page_furniture() && r.has_text())
            .collect();

        if eligible.is_empty() {
            return Vec::new();
        }

        let confidence =
            eligible.iter().map(|r| r.confidence).sum::<f32>() / eligible.len() as f32;
        let full_text = eligible
            .iter()
            .map(|r| r.raw_text())
            .collect::<Vec<_>>()
            .join("\n");

        let mut chunks = Vec::new();
        let mut buffer = String::new();
        let mut buffer_sentences: Vec<String> = Vec::new();

        for sentence in split_sentences(&full_text).map(collapse_whitespace) {
            if !buffer_sentences.is_empty() && char_len(&buffer) + char_len(&sentence) > self.size {
                let overlap = self.overlap_from(&buffer_sentences);
                self.push_chunk(
                    &mut chunks,
                    document_id,
                    ids,
                    &buffer,
                    confidence,
                    overlap.clone(),
                );

                buffer.clear();
                buffer_sentences.clear();
                if let Some(overlap) = overlap {
                    buffer.push_str(&overlap);
                }
            }

            if !buffer.is_empty() {
                buffer.push(' ');
            }
            buffer.push_str(&sentence);
            buffer_sentences.push(sentence);
        }

        if !buffer_sentences.is_empty() {
            self.push_chunk(&mut chunks, document_id, ids, &buffer, confidence, None);
        }

        debug!(
            "Fixed-size segmentation: {} chars -> {} chunks (size={}, overlap={})",
            char_len(&full_text),
            chunks.len(),
            self.size,
            self.overlap_chars
        );

        chunks
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `n` characters of `text`.
fn head_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
