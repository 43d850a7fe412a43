//! Cross-reference pass over a document's final chunk order.

use crate::document::chunk::{Chunk, ChunkId};
use std::collections::HashMap;
use tracing::debug;

/// Re-index and link a document's chunks in their current order.
///
/// Sets `sequence_index`, `total_count`, `prev_id`/`next_id` and `sibling_ids`
/// (chunks sharing a `parent_section`, "root" when absent). Every field is
/// recomputed from scratch, so linking twice gives the same result.
pub fn link(mut chunks: Vec<Chunk>) -> Vec<Chunk> {
    let total = chunks.len();
    if total == 0 {
        return chunks;
    }

    let ids: Vec<ChunkId> = chunks.iter().map(|c| c.id.clone()).collect();

    let mut sections: HashMap<&str, Vec<&ChunkId>> = HashMap::new();
    for chunk in &chunks {
        sections.entry(chunk.section_key()).or_default().push(&chunk.id);
    }

    let siblings: Vec<Vec<ChunkId>> = chunks
        .iter()
        .map(|chunk| {
            sections
                .get(chunk.section_key())
                .map(|group| {
                    group
                        .iter()
                        .filter(|id| ***id != chunk.id)
                        .map(|id| (*id).clone())
                        .collect()
                })
                .unwrap_or_default()
        })
        .collect();
    let section_count = sections.len();
    drop(sections);

    for (i, (chunk, sibling_ids)) in chunks.iter_mut().zip(siblings).enumerate() {
        chunk.sequence_index = i;
        chunk.total_count = total;
        chunk.prev_id = i.checked_sub(1).map(|p| ids[p].clone());
        chunk.next_id = ids.get(i + 1).cloned();
        chunk.sibling_ids = sibling_ids;
    }

    debug!("Linked {} chunks across {} sections", total, section_count);

    chunks
}
